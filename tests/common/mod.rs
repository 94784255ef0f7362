//! In-process collaborators for driving `SparqlBackend` without a transport.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::Value;
use tower_lsp::lsp_types::{
    MessageType, TextDocumentContentChangeEvent, TextEdit, Url, WorkspaceEdit,
};

use sparql_prefix_language_server::lsp::backend::SparqlBackend;
use sparql_prefix_language_server::lsp::client::EditorClient;
use sparql_prefix_language_server::lsp::error::LookupError;
use sparql_prefix_language_server::lsp::models::LspDocument;
use sparql_prefix_language_server::lsp::registry::PrefixRegistry;
use sparql_prefix_language_server::lsp::vocabulary::{SearchHit, SearchResponse, VocabularySearch};

pub const FOAF: &str = "PREFIX foaf: <http://xmlns.com/foaf/0.1/>";
pub const DC: &str = "PREFIX dc: <http://purl.org/dc/elements/1.1/>";
pub const SCHEMA: &str = "PREFIX schema: <http://schema.org/>";

/// Registry answering from a fixed table; unknown names fail with 404.
#[derive(Default)]
pub struct MockRegistry {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
    /// Document edited by the first lookup, to simulate a concurrent change
    edit_during_lookup: Mutex<Option<Arc<LspDocument>>>,
}

impl MockRegistry {
    pub fn with(declarations: &[(&str, &str)]) -> Self {
        Self {
            responses: declarations
                .iter()
                .map(|(name, decl)| (name.to_string(), format!("{}\n", decl)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn edit_during_lookup(&self, document: Arc<LspDocument>) {
        *self.edit_during_lookup.lock().unwrap() = Some(document);
    }
}

#[async_trait::async_trait]
impl PrefixRegistry for MockRegistry {
    async fn resolve(&self, prefix: &str) -> Result<String, LookupError> {
        self.calls.lock().unwrap().push(prefix.to_string());

        let pending = self.edit_during_lookup.lock().unwrap().take();
        if let Some(document) = pending {
            let version = document.version().await + 1;
            let text = format!("{}\n# edited", document.text().await);
            document.apply(vec![full_change(&text)], version).await;
        }

        self.responses
            .get(prefix)
            .cloned()
            .ok_or_else(|| LookupError::Status {
                url: format!("http://registry.test/{}", prefix),
                status: 404,
            })
    }

    fn registry_name(&self) -> &'static str {
        "mock registry"
    }
}

/// Search service returning the same hits for every query.
#[derive(Default)]
pub struct MockSearch {
    local_names: Vec<String>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn with(local_names: &[&str]) -> Self {
        Self {
            local_names: local_names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VocabularySearch for MockSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse, LookupError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(LookupError::InvalidResponse("not json".to_string()));
        }
        Ok(SearchResponse {
            total_results: self.local_names.len() as u64,
            results: self
                .local_names
                .iter()
                .map(|name| SearchHit { local_name: vec![name.clone()] })
                .collect(),
        })
    }

    fn service_name(&self) -> &'static str {
        "mock search"
    }
}

/// Editor double recording every edit and log message.
pub struct RecordingClient {
    settings: Value,
    applies_edits: bool,
    edits: Mutex<Vec<WorkspaceEdit>>,
    logs: Mutex<Vec<(MessageType, String)>>,
    pub configuration_requests: AtomicUsize,
    pub registrations: AtomicUsize,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::with_settings(Value::Null)
    }

    pub fn with_settings(settings: Value) -> Self {
        Self {
            settings,
            applies_edits: true,
            edits: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
            configuration_requests: AtomicUsize::new(0),
            registrations: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self { applies_edits: false, ..Self::new() }
    }

    pub fn edits(&self) -> Vec<WorkspaceEdit> {
        self.edits.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(typ, _)| *typ == MessageType::WARNING)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl EditorClient for RecordingClient {
    async fn configuration(&self, _scope: &Url, _section: &str) -> anyhow::Result<Value> {
        self.configuration_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.settings.clone())
    }

    async fn apply_edit(&self, edit: WorkspaceEdit) -> anyhow::Result<bool> {
        self.edits.lock().unwrap().push(edit);
        Ok(self.applies_edits)
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        self.logs.lock().unwrap().push((typ, message));
    }

    async fn register_configuration_watch(&self) -> anyhow::Result<()> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct Harness {
    pub backend: SparqlBackend,
    pub client: Arc<RecordingClient>,
    pub registry: Arc<MockRegistry>,
    pub search: Arc<MockSearch>,
}

impl Harness {
    pub fn new(client: RecordingClient, registry: MockRegistry, search: MockSearch) -> Self {
        let client = Arc::new(client);
        let registry = Arc::new(registry);
        let search = Arc::new(search);
        let backend = SparqlBackend::new(client.clone(), registry.clone(), search.clone());
        Self { backend, client, registry, search }
    }

    pub fn with_registry(registry: MockRegistry) -> Self {
        Self::new(RecordingClient::new(), registry, MockSearch::default())
    }

    pub fn with_search(search: MockSearch) -> Self {
        Self::new(RecordingClient::new(), MockRegistry::default(), search)
    }
}

pub fn uri(name: &str) -> Url {
    Url::parse(&format!("file:///tmp/{}", name)).unwrap()
}

pub fn full_change(text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: None,
        range_length: None,
        text: text.to_string(),
    }
}

/// Text edits of `edit` for `uri`, in submission order.
pub fn text_edits(edit: &WorkspaceEdit, uri: &Url) -> Vec<TextEdit> {
    edit.changes
        .as_ref()
        .and_then(|changes| changes.get(uri))
        .cloned()
        .unwrap_or_default()
}

/// Polls until the client has received `count` edits or the timeout elapses.
pub async fn wait_for_edits(client: &RecordingClient, count: usize) -> Vec<WorkspaceEdit> {
    for _ in 0..200 {
        let edits = client.edits();
        if edits.len() >= count {
            return edits;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    client.edits()
}
