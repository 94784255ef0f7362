//! Change pipeline
//!
//! Declares prefixes the author used without declaring them:
//! 1. Extract the prefix table from the leading declaration block
//! 2. Classify candidate tokens on every later line
//! 3. Resolve unknown prefixes against the registry, one at a time
//! 4. Submit one batched edit inserting the resolved declarations
//!
//! Lookups are sequential because each resolved prefix joins the known set
//! before the next token is examined. The known set belongs to the pass and is
//! threaded through it explicitly.

use std::collections::HashSet;

use anyhow::anyhow;
use tower_lsp::lsp_types::Url;
use tracing::{debug, error, info, trace};

use super::state::SparqlBackend;
use crate::lsp::registry::ensure_declares;
use crate::prefix::{
    KnownPrefixes, PrefixInsertionBatch, classify_line, extract_prefix_table,
    is_declaration_line, parse_declaration, split_lines,
};

/// How a change pipeline invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Every candidate token already has a declaration
    UpToDate,
    /// Candidates were found but no lookup succeeded
    NothingResolved,
    /// The document changed while lookups were in flight; the edit was dropped
    Superseded,
    /// The editor refused the edit
    Rejected,
    /// An edit inserting this many declarations was applied
    Applied(usize),
}

/// Work done by one pass over a document snapshot.
#[derive(Debug, Default)]
struct PrefixPass {
    batch: PrefixInsertionBatch,
    /// Distinct prefixes sent to the registry
    lookups: usize,
}

impl SparqlBackend {
    /// Runs the change pipeline for an open document.
    pub async fn declare_missing_prefixes(&self, uri: &Url) -> anyhow::Result<ChangeOutcome> {
        let document = self
            .document(uri)
            .ok_or_else(|| anyhow!("document is not open: {}", uri))?;

        let settings = self.settings.get(self.client.as_ref(), uri).await;
        let snapshot = document.snapshot().await;
        debug!(
            "Scanning {} (version {}, generation {}) for undeclared prefixes",
            uri, snapshot.version, snapshot.generation
        );

        let pass = self
            .resolve_undeclared(&snapshot.text, settings.max_number_of_problems)
            .await;

        if pass.lookups == 0 {
            return Ok(ChangeOutcome::UpToDate);
        }
        if pass.batch.is_empty() {
            return Ok(ChangeOutcome::NothingResolved);
        }

        let current = document.generation().await;
        if current != snapshot.generation {
            debug!(
                "Dropping prefix edit for {}: generation {} superseded by {}",
                uri, snapshot.generation, current
            );
            return Ok(ChangeOutcome::Superseded);
        }

        let count = pass.batch.len();
        let names: Vec<&str> = pass.batch.names().collect();
        info!("Declaring {} prefix(es) in {}: {}", count, uri, names.join(", "));

        if self.client.apply_edit(pass.batch.into_workspace_edit(uri)).await? {
            Ok(ChangeOutcome::Applied(count))
        } else {
            Ok(ChangeOutcome::Rejected)
        }
    }

    /// Resolves every undeclared candidate token in `text`.
    ///
    /// A failed lookup is reported on the log channel and never retried within
    /// the pass; the remaining tokens are still processed.
    async fn resolve_undeclared(&self, text: &str, cap: usize) -> PrefixPass {
        let extraction = extract_prefix_table(text);
        let mut known = KnownPrefixes::from_table(&extraction.table);
        let mut failed: HashSet<String> = HashSet::new();
        let mut pass = PrefixPass::default();

        for line in split_lines(text).skip(extraction.declaration_lines) {
            if is_declaration_line(line) {
                if let Some(declaration) = parse_declaration(line) {
                    trace!("Late declaration of {}", declaration.name);
                    known.insert(declaration.name);
                }
                continue;
            }

            for token in classify_line(line, &known, cap) {
                if known.contains(&token.name) || failed.contains(&token.name) {
                    continue;
                }

                pass.lookups += 1;
                let resolved = self.registry.resolve(&token.name).await.and_then(|declaration| {
                    ensure_declares(&token.name, &declaration)?;
                    Ok(declaration)
                });
                match resolved {
                    Ok(declaration) => {
                        debug!("Resolved {} to {:?}", token.name, declaration.trim_end());
                        known.insert(token.name.clone());
                        pass.batch.push(token.name, &declaration);
                    }
                    Err(e) => {
                        self.warn_operator(format!("Prefix name error: {} ({})", token.name, e))
                            .await;
                        failed.insert(token.name);
                    }
                }
            }
        }

        pass
    }

    /// Runs the change pipeline in the background, logging its outcome.
    pub(super) fn spawn_change_pipeline(&self, uri: Url) {
        let backend = self.clone();
        tokio::spawn(async move {
            match backend.declare_missing_prefixes(&uri).await {
                Ok(outcome) => debug!("Change pipeline for {} finished: {:?}", uri, outcome),
                Err(e) => error!("Change pipeline failed for {}: {}", uri, e),
            }
        });
    }
}
