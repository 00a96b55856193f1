//! Linking provider fed by a native host bridge.

use async_trait::async_trait;
use parking_lot::Mutex;

use rowt_core::{Result, RowtError};

use super::{LinkingCapability, ListenerRegistry, Subscription, UrlHandler};

/// Provider for hosts whose native layer pushes URLs into the SDK.
///
/// The bridge reports the launch URL once with
/// [`NativeLinking::set_launch_url`] and forwards every later URL through
/// [`NativeLinking::handle_url`]. A URL that arrives while nobody is
/// listening is kept as the pending initial link and handed out by the
/// next [`LinkingCapability::initial_url`] call.
///
/// This provider cannot build or open app URLs.
#[derive(Debug)]
pub struct NativeLinking {
    available: bool,
    launch_url: Mutex<Option<String>>,
    pending_url: Mutex<Option<String>>,
    listeners: ListenerRegistry,
}

impl Default for NativeLinking {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeLinking {
    pub fn new() -> Self {
        Self {
            available: true,
            launch_url: Mutex::new(None),
            pending_url: Mutex::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Provider for a host without the native bridge module. Initial URL
    /// lookups fail and subscriptions never fire.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Record the URL the app was launched with.
    pub fn set_launch_url(&self, url: impl Into<String>) {
        *self.launch_url.lock() = Some(url.into());
    }

    /// Forward a URL received by the host. Dispatched to listeners when
    /// there are any, otherwise held as the pending initial link.
    pub fn handle_url(&self, url: impl Into<String>) {
        let url = url.into();
        if !self.available {
            log::warn!("dropping deep link {url}: native linking module is not available");
            return;
        }
        if self.listeners.dispatch(&url) == 0 {
            log::debug!("no deep link listeners yet, holding {url}");
            *self.pending_url.lock() = Some(url);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl LinkingCapability for NativeLinking {
    async fn initial_url(&self) -> Result<Option<String>> {
        if !self.available {
            return Err(RowtError::Linking(
                "native linking module is not available".to_string(),
            ));
        }
        if let Some(url) = self.launch_url.lock().clone() {
            return Ok(Some(url));
        }
        Ok(self.pending_url.lock().take())
    }

    fn subscribe(&self, handler: UrlHandler) -> Subscription {
        if !self.available {
            log::warn!("cannot add deep link listener: native linking module is not available");
            return Subscription::noop();
        }
        self.listeners.add(handler)
    }
}
