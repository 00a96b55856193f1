//! Rowt SDK
//!
//! Client-side deep link SDK: reads the URL the app was opened with,
//! forwards incoming deep links to listeners, builds app URLs where the
//! platform allows it, and creates shortlinks on a Rowt server.
//!
//! The platform's linking subsystem is injected as a
//! [`LinkingCapability`] when the [`Rowt`] facade is built.

pub mod config;
pub mod facade;
pub mod linking;

pub use config::{ConfigStore, ConfigUpdate, SdkConfig};
pub use facade::Rowt;
pub use linking::{
    LinkingCapability, ListenerRegistry, ManagedLinking, NativeLinking, Subscription, UrlHandler,
    UrlOpener,
};

// Re-export the pieces callers need alongside the facade
pub use rowt_core::{Capabilities, ParsedDeepLink, Result, RowtError};
pub use rowt_link::{LinkClient, LinkConfig, LinkOptions};
