//! Backend state management
//!
//! This module defines the SparqlBackend struct, which owns the open documents,
//! the per-document settings cache and the remote collaborators.

use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use crate::lsp::client::EditorClient;
use crate::lsp::models::LspDocument;
use crate::lsp::registry::PrefixRegistry;
use crate::lsp::settings::DocumentSettings;
use crate::lsp::vocabulary::VocabularySearch;

/// The SPARQL prefix language server backend.
#[derive(Clone)]
pub struct SparqlBackend {
    pub(super) client: Arc<dyn EditorClient>,
    pub(super) documents_by_uri: Arc<DashMap<Url, Arc<LspDocument>>>,
    pub(super) serial_document_id: Arc<AtomicU32>,
    pub(super) settings: Arc<DocumentSettings>,
    /// Resolves undeclared prefixes to declarations (change pipeline)
    pub(super) registry: Arc<dyn PrefixRegistry>,
    /// Suggests vocabulary terms (completion pipeline)
    pub(super) search: Arc<dyn VocabularySearch>,
}

// Manual Debug implementation since the collaborators don't implement Debug
impl std::fmt::Debug for SparqlBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlBackend")
            .field("registry", &self.registry.registry_name())
            .field("search", &self.search.service_name())
            .field("documents_count", &self.documents_by_uri.len())
            .finish()
    }
}
