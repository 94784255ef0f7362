//! Prefix discovery for SPARQL documents
//!
//! Line-oriented analysis shared by the change and completion pipelines:
//! - Prefix table extraction from the leading declaration block
//! - Candidate token classification for undeclared prefixes
//! - Cursor token extraction for term completion
//! - Batched insertion edits for resolved declarations
//!
//! Nothing here performs I/O. Remote lookups live in `crate::lsp`.

pub mod cursor;
pub mod edit;
pub mod table;
pub mod token;

pub use cursor::{CursorToken, extract_cursor_token};
pub use edit::{PrefixInsertionBatch, ResolvedPrefix};
pub use table::{
    MalformedDeclaration, PrefixDeclaration, PrefixExtraction, PrefixTable,
    extract_prefix_table, is_declaration_line, parse_declaration, split_lines,
};
pub use token::{CandidateToken, KnownPrefixes, candidate_tokens, classify_line};
