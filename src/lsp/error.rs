//! Errors raised by the remote lookup adapters

/// Failure of a registry or vocabulary search request.
///
/// Callers recover locally: a failed registry lookup leaves its prefix
/// unresolved for the pass, a failed search yields no completions.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
