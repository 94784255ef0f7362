//! Batched insertion of resolved prefix declarations

use std::collections::HashMap;

use tower_lsp::lsp_types::{Position, Range, TextEdit, Url, WorkspaceEdit};

/// A prefix resolved by the registry, with the text to insert for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrefix {
    pub name: String,
    pub declaration: String,
}

/// Declarations collected during one change pass, in the order their tokens
/// were encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixInsertionBatch {
    insertions: Vec<ResolvedPrefix>,
}

impl PrefixInsertionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `declaration` for `name`. The text is stored with exactly one
    /// trailing newline so consecutive insertions stay on separate lines.
    pub fn push(&mut self, name: impl Into<String>, declaration: &str) {
        self.insertions.push(ResolvedPrefix {
            name: name.into(),
            declaration: format!("{}\n", declaration.trim_end()),
        });
    }

    pub fn len(&self) -> usize {
        self.insertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.insertions.iter().map(|p| p.name.as_str())
    }

    pub fn insertions(&self) -> &[ResolvedPrefix] {
        &self.insertions
    }

    /// Builds a single edit inserting every queued declaration at line 0,
    /// column 0 of `uri`. Same-position inserts keep their array order.
    pub fn into_workspace_edit(self, uri: &Url) -> WorkspaceEdit {
        let origin = Position::new(0, 0);
        let edits = self
            .insertions
            .into_iter()
            .map(|insertion| TextEdit {
                range: Range::new(origin, origin),
                new_text: insertion.declaration,
            })
            .collect();

        WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), edits)])),
            ..Default::default()
        }
    }
}
