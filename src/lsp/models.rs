use tokio::sync::RwLock;

use ropey::Rope;

use tower_lsp::lsp_types::Url;

/// State for an open text document managed by the LSP server.
#[derive(Debug)]
pub struct LspDocumentState {
    pub uri: Url,
    pub text: Rope,
    pub version: i32,
    /// Incremented on every applied change; pipelines compare it before
    /// submitting edits computed from an older snapshot.
    pub generation: u64,
}

/// LSP document with state for open files.
#[derive(Debug)]
pub struct LspDocument {
    pub id: u32,
    pub state: RwLock<LspDocumentState>,
}

/// Immutable text of a document at one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub text: String,
    pub version: i32,
    pub generation: u64,
}
