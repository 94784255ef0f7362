//! Vocabulary term search
//!
//! Suggests terms for a namespace URI plus a partially typed local name. The
//! default deployment queries the Linked Open Vocabularies autocomplete API.

use serde::Deserialize;
use tracing::debug;

use super::error::LookupError;

pub const DEFAULT_SEARCH_URL: &str = "https://lov.linkeddata.es/dataset/lov/api/v2/term/autocomplete";

/// Response body of a term search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One suggested term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Local names of the term; the first one is used for completion
    #[serde(rename = "localName", default)]
    pub local_name: Vec<String>,
}

#[async_trait::async_trait]
pub trait VocabularySearch: Send + Sync {
    /// Search for terms starting with `query` (namespace URI + typed suffix)
    async fn search(&self, query: &str) -> Result<SearchResponse, LookupError>;

    fn service_name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct HttpVocabularySearch {
    http: reqwest::Client,
    base_url: String,
}

impl HttpVocabularySearch {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl VocabularySearch for HttpVocabularySearch {
    async fn search(&self, query: &str) -> Result<SearchResponse, LookupError> {
        debug!("Searching vocabulary terms for {}", query);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: self.base_url.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| LookupError::InvalidResponse(format!("failed to parse search response: {e}")))
    }

    fn service_name(&self) -> &'static str {
        "LOV autocomplete (HTTP)"
    }
}
