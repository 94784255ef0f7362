//! Per-document settings
//!
//! Settings come from the client's `workspace/configuration` when it supports
//! that request, and are cached per document until the configuration changes
//! or the document closes. Clients without the capability share one global
//! value taken from `workspace/didChangeConfiguration`.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

use super::client::EditorClient;

/// Configuration section read from the client.
pub const SETTINGS_SECTION: &str = "languageServerSPARQLPREFIX";

pub const DEFAULT_MAX_NUMBER_OF_PROBLEMS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Maximum number of candidate tokens examined per line
    pub max_number_of_problems: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_number_of_problems: DEFAULT_MAX_NUMBER_OF_PROBLEMS,
        }
    }
}

impl Settings {
    /// Reads settings from a configuration payload. Null or invalid payloads
    /// yield the defaults.
    pub fn from_value(value: &Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("Invalid {} settings {}: {}", SETTINGS_SECTION, value, e);
            Self::default()
        })
    }
}

#[derive(Debug, Default)]
pub struct DocumentSettings {
    has_configuration_capability: AtomicBool,
    global: RwLock<Settings>,
    cache: DashMap<Url, Settings>,
}

impl DocumentSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_configuration_capability(&self, supported: bool) {
        self.has_configuration_capability.store(supported, Ordering::Relaxed);
    }

    pub fn has_configuration_capability(&self) -> bool {
        self.has_configuration_capability.load(Ordering::Relaxed)
    }

    /// Settings for `uri`, fetched from the client on first use.
    ///
    /// Failed fetches fall back to the defaults and are not cached.
    pub async fn get(&self, client: &dyn EditorClient, uri: &Url) -> Settings {
        if !self.has_configuration_capability() {
            return *self.global.read().await;
        }
        if let Some(cached) = self.cache.get(uri) {
            return *cached;
        }

        match client.configuration(uri, SETTINGS_SECTION).await {
            Ok(value) => {
                let settings = Settings::from_value(&value);
                debug!("Fetched settings for {}: {:?}", uri, settings);
                self.cache.insert(uri.clone(), settings);
                settings
            }
            Err(e) => {
                warn!("Failed to fetch settings for {}: {}", uri, e);
                Settings::default()
            }
        }
    }

    /// Applies a `workspace/didChangeConfiguration` payload.
    pub async fn configuration_changed(&self, payload: &Value) {
        if self.has_configuration_capability() {
            debug!("Configuration changed, clearing {} cached settings", self.cache.len());
            self.cache.clear();
        } else {
            let section = payload.get(SETTINGS_SECTION).unwrap_or(&Value::Null);
            *self.global.write().await = Settings::from_value(section);
        }
    }

    /// Drops the cached settings of a closed document.
    pub fn forget(&self, uri: &Url) {
        self.cache.remove(uri);
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
