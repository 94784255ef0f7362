//! Editor-facing collaborator
//!
//! The backend only needs four things from the editor: per-document
//! configuration, edit submission, the log channel, and dynamic registration.
//! Keeping them behind a trait lets tests drive the backend without a
//! transport.

use anyhow::anyhow;
use serde_json::Value;
use tower_lsp::Client;
use tower_lsp::lsp_types::{ConfigurationItem, MessageType, Registration, Url, WorkspaceEdit};
use tracing::debug;

#[async_trait::async_trait]
pub trait EditorClient: Send + Sync {
    /// Fetch the configuration `section` scoped to document `scope`
    async fn configuration(&self, scope: &Url, section: &str) -> anyhow::Result<Value>;

    /// Submit a workspace edit, returning whether the editor applied it
    async fn apply_edit(&self, edit: WorkspaceEdit) -> anyhow::Result<bool>;

    /// Write to the operator-facing log channel
    async fn log_message(&self, typ: MessageType, message: String);

    /// Ask to be notified of configuration changes
    async fn register_configuration_watch(&self) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl EditorClient for Client {
    async fn configuration(&self, scope: &Url, section: &str) -> anyhow::Result<Value> {
        let item = ConfigurationItem {
            scope_uri: Some(scope.clone()),
            section: Some(section.to_string()),
        };
        let mut values = Client::configuration(self, vec![item])
            .await
            .map_err(|e| anyhow!("workspace/configuration failed: {}", e))?;
        Ok(values.pop().unwrap_or(Value::Null))
    }

    async fn apply_edit(&self, edit: WorkspaceEdit) -> anyhow::Result<bool> {
        let response = Client::apply_edit(self, edit)
            .await
            .map_err(|e| anyhow!("workspace/applyEdit failed: {}", e))?;
        if !response.applied {
            debug!("Edit not applied: {:?}", response.failure_reason);
        }
        Ok(response.applied)
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        Client::log_message(self, typ, message).await;
    }

    async fn register_configuration_watch(&self) -> anyhow::Result<()> {
        let registration = Registration {
            id: "sparql-prefix/didChangeConfiguration".to_string(),
            method: "workspace/didChangeConfiguration".to_string(),
            register_options: None,
        };
        self.register_capability(vec![registration])
            .await
            .map_err(|e| anyhow!("client/registerCapability failed: {}", e))
    }
}
