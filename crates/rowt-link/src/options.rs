//! Link creation inputs and the request payload sent to the Rowt server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use rowt_core::{Result, RowtError};

// =============================================================================
// Server Binding
// =============================================================================

/// Server, credentials and project a link is created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfig {
    /// Server address, with or without scheme (`rowt.app`, `https://rowt.app`).
    pub server_url: String,
    pub api_key: String,
    pub project_id: String,
}

impl LinkConfig {
    pub fn new(
        server_url: impl Into<String>,
        api_key: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
            project_id: project_id.into(),
        }
    }

    /// Check that every field is present.
    pub fn validate(&self) -> Result<()> {
        require("serverUrl", &self.server_url)?;
        require("apiKey", &self.api_key)?;
        require("projectId", &self.project_id)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RowtError::Configuration(format!("{field} is required")));
    }
    Ok(())
}

// =============================================================================
// Link Options
// =============================================================================

/// Metadata describing the link to create. Only `url` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOptions {
    /// Target the shortlink redirects to.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "js_date")]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

impl LinkOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn fallback_url_override(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_url_override = Some(fallback.into());
        self
    }

    /// Add one entry to `additionalMetadata`.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add one entry to `properties`.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Wire Payload
// =============================================================================

/// JSON body of `POST <server>/link`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LinkPayload<'a> {
    pub project_id: &'a str,
    pub api_key: &'a str,
    #[serde(flatten)]
    pub options: &'a LinkOptions,
}

impl<'a> LinkPayload<'a> {
    pub fn new(config: &'a LinkConfig, options: &'a LinkOptions) -> Self {
        Self {
            project_id: &config.project_id,
            api_key: &config.api_key,
            options,
        }
    }
}

/// Timestamps in the shape `JSON.stringify(new Date())` produces:
/// RFC 3339, millisecond precision, `Z` suffix.
mod js_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
