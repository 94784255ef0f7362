//! Completion pipeline
//!
//! Completes `prefix:partial` at the cursor by searching the vocabulary
//! service for the declared namespace followed by the typed suffix. Every
//! failure degrades to an empty list.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Position, Url};
use tracing::{debug, trace};

use super::state::SparqlBackend;
use crate::lsp::vocabulary::SearchResponse;
use crate::prefix::{extract_cursor_token, extract_prefix_table};

/// Maps search hits to completion items labelled `prefix + localName`.
pub fn completion_items(prefix: &str, response: &SearchResponse) -> Vec<CompletionItem> {
    if response.total_results == 0 {
        return Vec::new();
    }

    response
        .results
        .iter()
        .filter_map(|hit| hit.local_name.first())
        .map(|local_name| CompletionItem {
            label: format!("{}{}", prefix, local_name),
            kind: Some(CompletionItemKind::PROPERTY),
            ..Default::default()
        })
        .collect()
}

impl SparqlBackend {
    /// Completion candidates for the prefixed identifier ending at `position`.
    pub async fn complete_prefixed_term(&self, uri: &Url, position: Position) -> Vec<CompletionItem> {
        let Some(document) = self.document(uri) else {
            debug!("Completion requested for unknown document {}", uri);
            return Vec::new();
        };
        let text = document.text().await;

        let Some(token) = extract_cursor_token(&text, position) else {
            trace!("No prefixed identifier at {}:{:?}", uri, position);
            return Vec::new();
        };

        let table = extract_prefix_table(&text).table;
        let Some(namespace) = table.namespace(&token.prefix) else {
            debug!("Prefix {} is not declared in {}", token.prefix, uri);
            return Vec::new();
        };

        let query = format!("{}{}", namespace, token.suffix);
        match self.search.search(&query).await {
            Ok(response) => {
                let items = completion_items(&token.prefix, &response);
                debug!("Search for {} returned {} item(s)", query, items.len());
                items
            }
            Err(e) => {
                debug!("Bad query {}: {}", query, e);
                Vec::new()
            }
        }
    }
}
