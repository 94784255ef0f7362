//! Prefix registry lookups
//!
//! The registry maps a bare prefix name to a canonical `PREFIX` declaration.
//! The default deployment talks to prefix.cc, which serves declarations at
//! `<base>/<name>.file.sparql`.

use tracing::debug;

use super::error::LookupError;
use crate::prefix::{PrefixDeclaration, is_declaration_line, parse_declaration, split_lines};

pub const DEFAULT_REGISTRY_URL: &str = "http://prefix.cc";

/// Common interface for prefix registries
///
/// Implementations perform exactly one lookup per call and never retry.
#[async_trait::async_trait]
pub trait PrefixRegistry: Send + Sync {
    /// Fetch the declaration fragment for `prefix` (e.g. `foaf:`)
    async fn resolve(&self, prefix: &str) -> Result<String, LookupError>;

    /// Get a human-readable name for this registry (for logging/debugging)
    fn registry_name(&self) -> &'static str;
}

/// Registry served over HTTP in the prefix.cc layout.
#[derive(Debug, Clone)]
pub struct HttpPrefixRegistry {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPrefixRegistry {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// URL of the declaration fragment for `prefix`, with its colon trimmed.
    pub fn lookup_url(&self, prefix: &str) -> String {
        let name = prefix.strip_suffix(':').unwrap_or(prefix);
        format!("{}/{}.file.sparql", self.base_url, name)
    }
}

/// Parses the first non-empty line of a registry body as a declaration.
fn leading_declaration(body: &str) -> Result<PrefixDeclaration, LookupError> {
    let first = split_lines(body)
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| LookupError::InvalidResponse("empty registry response".to_string()))?;

    is_declaration_line(first)
        .then(|| parse_declaration(first))
        .flatten()
        .ok_or_else(|| {
            LookupError::InvalidResponse(format!("expected a PREFIX declaration, got {:?}", first))
        })
}

/// Checks that a registry body is a declaration and returns it with a single
/// trailing newline.
pub fn declaration_fragment(body: &str) -> Result<String, LookupError> {
    leading_declaration(body)?;
    Ok(format!("{}\n", body.trim()))
}

/// Checks that `fragment` declares `prefix` itself. Prefix names are case
/// sensitive, so a fragment for another spelling would never satisfy the
/// token it was fetched for.
pub fn ensure_declares(prefix: &str, fragment: &str) -> Result<(), LookupError> {
    let declaration = leading_declaration(fragment)?;
    if declaration.name == prefix {
        Ok(())
    } else {
        Err(LookupError::InvalidResponse(format!(
            "registry declared {} for {}",
            declaration.name, prefix
        )))
    }
}

#[async_trait::async_trait]
impl PrefixRegistry for HttpPrefixRegistry {
    async fn resolve(&self, prefix: &str) -> Result<String, LookupError> {
        let url = self.lookup_url(prefix);
        debug!("Resolving prefix {} via {}", prefix, url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        declaration_fragment(&body)
    }

    fn registry_name(&self) -> &'static str {
        "prefix.cc (HTTP)"
    }
}
