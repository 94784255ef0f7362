use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use tower_lsp::lsp_types::{MessageType, Url};
use tracing::{info, warn};

use crate::lsp::client::EditorClient;
use crate::lsp::models::LspDocument;
use crate::lsp::registry::PrefixRegistry;
use crate::lsp::settings::DocumentSettings;
use crate::lsp::vocabulary::VocabularySearch;

mod change;
mod completion;
mod handlers;
mod state;

pub use change::ChangeOutcome;
pub use completion::completion_items;
pub use state::SparqlBackend;

impl SparqlBackend {
    /// Creates a backend that talks to the editor through `client` and to the
    /// outside world through `registry` and `search`.
    pub fn new(
        client: Arc<dyn EditorClient>,
        registry: Arc<dyn PrefixRegistry>,
        search: Arc<dyn VocabularySearch>,
    ) -> Self {
        info!(
            "Creating backend with registry {} and search {}",
            registry.registry_name(),
            search.service_name()
        );

        Self {
            client,
            documents_by_uri: Arc::new(DashMap::new()),
            serial_document_id: Arc::new(AtomicU32::new(0)),
            settings: Arc::new(DocumentSettings::new()),
            registry,
            search,
        }
    }

    fn next_document_id(&self) -> u32 {
        self.serial_document_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Stores a newly opened document, replacing any previous one at `uri`.
    pub fn open_document(&self, uri: Url, text: &str, version: i32) -> Arc<LspDocument> {
        let id = self.next_document_id();
        let document = Arc::new(LspDocument::new(id, uri.clone(), text, version));
        self.documents_by_uri.insert(uri, document.clone());
        document
    }

    pub fn document(&self, uri: &Url) -> Option<Arc<LspDocument>> {
        self.documents_by_uri.get(uri).map(|r| r.value().clone())
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// Reports a recoverable problem on the operator-facing log channel.
    pub(crate) async fn warn_operator(&self, message: String) {
        warn!("{}", message);
        self.client.log_message(MessageType::WARNING, message).await;
    }
}
