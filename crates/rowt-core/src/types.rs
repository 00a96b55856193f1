//! Core type definitions for Rowt
//!
//! These types are produced by the parser and consumed by the SDK facade
//! and the platform linking providers.

use std::collections::HashMap;

use serde::Serialize;

// =============================================================================
// Parsed Deep Link
// =============================================================================

/// Structured view of a deep link such as `rowtapp://open/profile/42?ref=abc`.
///
/// Built fresh by every [`crate::url::parse_deep_link`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDeepLink {
    pub scheme: String,
    /// Empty when the link has no host (`app:///path`).
    pub host: String,
    /// Always starts with `/`; `/` when the link has no path.
    pub path: String,
    /// Non-empty components of `path`, in order.
    pub segments: Vec<String>,
    /// Percent-decoded query parameters. Later duplicates win.
    pub params: HashMap<String, String>,
    pub original_url: String,
}

impl ParsedDeepLink {
    /// Look up a decoded query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Path segment at `index`, if present.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }
}

// =============================================================================
// Capabilities (bit mask of optional linking operations)
// =============================================================================

bitflags::bitflags! {
    /// Optional operations a linking provider supports on top of
    /// "get initial URL" and "subscribe", which every provider has.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Generate app URLs from a path and query parameters
        const CREATE_URL = 1 << 0;
        /// Ask the platform whether a URL can be opened
        const CAN_OPEN_URL = 1 << 1;
        /// Hand a URL to the platform to open
        const OPEN_URL = 1 << 2;
    }
}

impl Capabilities {
    /// Name of a single capability, for error messages.
    pub fn name(self) -> &'static str {
        if self == Self::CREATE_URL {
            "createURL"
        } else if self == Self::CAN_OPEN_URL {
            "canOpenURL"
        } else if self == Self::OPEN_URL {
            "openURL"
        } else {
            "unknown"
        }
    }
}
