//! Platform linking capability
//!
//! The host's linking subsystem is reached through [`LinkingCapability`].
//! Every provider can report the URL the app was launched with and deliver
//! URLs received while running; app-URL generation and URL opening are
//! optional and advertised through [`Capabilities`].
//!
//! Two providers ship with the SDK:
//!
//! - [`NativeLinking`]: the host bridge pushes launch and resume URLs in.
//! - [`ManagedLinking`]: a runtime that knows the app's URL prefix and can
//!   build and open app URLs.

use std::collections::BTreeMap;

use async_trait::async_trait;

use rowt_core::{Capabilities, Result, RowtError};

mod managed;
mod native;
mod registry;

pub use managed::{ManagedLinking, UrlOpener};
pub use native::NativeLinking;
pub use registry::{ListenerRegistry, Subscription, UrlHandler};

/// Operations the SDK consumes from the platform's linking subsystem.
#[async_trait]
pub trait LinkingCapability: Send + Sync {
    /// Optional operations this provider supports.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// URL the process was launched or resumed with, if any.
    async fn initial_url(&self) -> Result<Option<String>>;

    /// Deliver every URL received from now on to `handler`.
    fn subscribe(&self, handler: UrlHandler) -> Subscription;

    /// Build an app URL for `path` with `params` as its query.
    fn create_url(&self, _path: &str, _params: &BTreeMap<String, String>) -> Result<String> {
        Err(unsupported(Capabilities::CREATE_URL))
    }

    async fn can_open_url(&self, _url: &str) -> Result<bool> {
        Err(unsupported(Capabilities::CAN_OPEN_URL))
    }

    async fn open_url(&self, _url: &str) -> Result<()> {
        Err(unsupported(Capabilities::OPEN_URL))
    }
}

/// Error for a capability the active provider lacks.
pub fn unsupported(capability: Capabilities) -> RowtError {
    RowtError::UnsupportedOperation(format!(
        "{} is not available with the current linking provider",
        capability.name()
    ))
}
