//! SDK configuration set through `Rowt::initialize`.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use rowt_core::{Result, RowtError};

pub const ENV_API_KEY: &str = "ROWT_API_KEY";
pub const ENV_BASE_URL: &str = "ROWT_BASE_URL";
pub const ENV_DEBUG: &str = "ROWT_DEBUG";

/// Effective SDK configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    /// Attached to shortlinks created through the facade.
    pub api_key: Option<String>,
    /// Default server for link creation.
    #[serde(rename = "baseURL", alias = "baseUrl")]
    pub base_url: Option<String>,
    /// Log lifecycle events (initialization, deep link receipt, errors).
    #[serde(default)]
    pub debug: bool,
}

impl SdkConfig {
    /// Overlay the fields present in `update`.
    pub fn merged(&self, update: &ConfigUpdate) -> Self {
        Self {
            api_key: update.api_key.clone().or_else(|| self.api_key.clone()),
            base_url: update.base_url.clone().or_else(|| self.base_url.clone()),
            debug: update.debug.unwrap_or(self.debug),
        }
    }
}

impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Partial configuration passed to `initialize`. Absent fields keep their
/// previous value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, rename = "baseURL", alias = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Parse `{"apiKey": ..., "baseURL": ..., "debug": ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RowtError::Configuration(format!("Invalid SDK configuration: {e}")))
    }

    /// Read `ROWT_API_KEY`, `ROWT_BASE_URL` and `ROWT_DEBUG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build an update from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let debug = non_empty(ENV_DEBUG).and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            other => {
                log::warn!("ignoring {ENV_DEBUG}={other:?}: expected a boolean");
                None
            }
        });

        Self {
            api_key: non_empty(ENV_API_KEY),
            base_url: non_empty(ENV_BASE_URL),
            debug,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.base_url.is_none() && self.debug.is_none()
    }
}

impl fmt::Debug for ConfigUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigUpdate")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .finish()
    }
}

// =============================================================================
// Config Store
// =============================================================================

/// Holds the current configuration. Updates build a new record and swap
/// the pointer, so readers see either the old or the new snapshot.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Arc<SdkConfig>>,
}

impl ConfigStore {
    pub fn new(config: SdkConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    pub fn snapshot(&self) -> Arc<SdkConfig> {
        Arc::clone(&self.current.read())
    }

    pub fn is_debug(&self) -> bool {
        self.current.read().debug
    }

    /// Merge `update` over the current record and return the result.
    pub fn merge(&self, update: &ConfigUpdate) -> Arc<SdkConfig> {
        let mut current = self.current.write();
        let next = Arc::new(current.merged(update));
        *current = Arc::clone(&next);
        next
    }
}
