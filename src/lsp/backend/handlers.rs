//! LSP protocol handler implementations
//!
//! This module contains the `tower_lsp::LanguageServer` trait implementation
//! for the SPARQL backend:
//! - Lifecycle handlers (initialize, initialized, shutdown)
//! - Document lifecycle (did_open, did_change, did_close)
//! - Workspace notifications (configuration and watched files)
//! - Completion and completion resolve

use tower_lsp::{LanguageServer, jsonrpc};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionOptions, CompletionParams, CompletionResponse,
    DidChangeConfigurationParams, DidChangeTextDocumentParams,
    DidChangeWatchedFilesParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, InitializeParams, InitializeResult,
    InitializedParams, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind,
    WorkspaceFoldersServerCapabilities, WorkspaceServerCapabilities,
};
use tower_lsp::jsonrpc::Result as LspResult;

use tracing::{debug, info, warn};

use super::state::SparqlBackend;

#[tower_lsp::async_trait]
impl LanguageServer for SparqlBackend {
    /// Handles the LSP initialize request, recording client capabilities.
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        info!("Received initialize: process_id={:?}", params.process_id);

        let workspace = params.capabilities.workspace.as_ref();
        let has_configuration = workspace.and_then(|w| w.configuration).unwrap_or(false);
        let has_workspace_folders = workspace.and_then(|w| w.workspace_folders).unwrap_or(false);
        self.settings.set_configuration_capability(has_configuration);
        debug!(
            "Client capabilities: configuration={}, workspace_folders={}",
            has_configuration, has_workspace_folders
        );

        let mut capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
            completion_provider: Some(CompletionOptions {
                trigger_characters: Some(vec![":".to_string()]),
                all_commit_characters: None,
                resolve_provider: Some(true),
                completion_item: None,
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        };
        if has_workspace_folders {
            capabilities.workspace = Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: None,
                }),
                file_operations: None,
            });
        }

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    /// Handles the LSP initialized notification.
    async fn initialized(&self, _: InitializedParams) {
        info!("Server initialized");
        if self.settings.has_configuration_capability() {
            if let Err(e) = self.client.register_configuration_watch().await {
                warn!("Failed to register for configuration changes: {}", e);
            }
        }
    }

    /// Handles the LSP shutdown request.
    async fn shutdown(&self) -> jsonrpc::Result<()> {
        info!("Received shutdown request");
        Ok(())
    }

    /// Handles opening a text document and declares its missing prefixes.
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let document = self.open_document(uri.clone(), &params.text_document.text, version);
        info!("Opened document: {}, id: {}, version: {}", uri, document.id, version);

        self.spawn_change_pipeline(uri);
    }

    /// Handles changes to a text document, applying incremental updates and
    /// re-running the change pipeline.
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        debug!("textDocument/didChange: {} version {}", uri, version);

        let Some(document) = self.document(&uri) else {
            warn!("Failed to find document with URI={}", uri);
            return;
        };

        if document.apply(params.content_changes, version).await.is_some() {
            self.spawn_change_pipeline(uri);
        } else {
            warn!("Failed to apply changes to document with URI={}", uri);
        }
    }

    /// Handles closing a text document, forgetting it and its settings.
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.settings.forget(&uri);
        if let Some((_key, document)) = self.documents_by_uri.remove(&uri) {
            info!("Closed document: {}, id: {}", uri, document.id);
        } else {
            warn!("Failed to find document with URI={}", uri);
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        debug!("workspace/didChangeConfiguration: {}", params.settings);
        self.settings.configuration_changed(&params.settings).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        info!("Received file change event ({} change(s))", params.changes.len());
    }

    async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        debug!("Completion request at {}:{:?}", uri, position);

        let items = self.complete_prefixed_term(&uri, position).await;
        Ok(Some(CompletionResponse::Array(items)))
    }

    /// Completion items carry everything up front; resolve returns them as is.
    async fn completion_resolve(&self, item: CompletionItem) -> LspResult<CompletionItem> {
        Ok(item)
    }
}
