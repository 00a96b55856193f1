//! Rowt Core Library
//!
//! This crate holds the platform-independent pieces of the Rowt deep link SDK:
//! the deep link parser, the app-URL builder, and the types shared by the
//! link client and the SDK facade.
//!
//! # Modules
//!
//! - `url`: Deep link parsing (`scheme://host/path?query`) and app-URL building
//! - `types`: Parsed deep link record and platform capability flags
//! - `error`: Error taxonomy shared by every Rowt crate

pub mod error;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use error::{Result, RowtError};
pub use types::{Capabilities, ParsedDeepLink};
pub use url::{build_app_url, parse_deep_link};
