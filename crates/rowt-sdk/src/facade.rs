//! SDK entry point.

use std::collections::BTreeMap;
use std::sync::Arc;

use rowt_core::{parse_deep_link, Capabilities, ParsedDeepLink, Result, RowtError};
use rowt_link::{LinkClient, LinkConfig, LinkOptions};

use crate::config::{ConfigStore, ConfigUpdate, SdkConfig};
use crate::linking::{unsupported, LinkingCapability, Subscription, UrlHandler};

/// The Rowt SDK facade.
///
/// Construct one at startup with the linking provider for the current
/// platform, call [`Rowt::initialize`], then share it (it is `Send + Sync`).
///
/// ```
/// use std::sync::Arc;
/// use rowt_sdk::{ConfigUpdate, NativeLinking, Rowt};
///
/// let linking = Arc::new(NativeLinking::new());
/// let rowt = Rowt::new(linking.clone());
/// rowt.initialize(ConfigUpdate::new().api_key("key").base_url("rowt.app"));
///
/// let sub = rowt.add_deep_link_listener(|url| println!("opened with {url}"));
/// linking.handle_url("rowtapp://open/profile/42");
/// sub.remove();
/// ```
pub struct Rowt {
    config: Arc<ConfigStore>,
    linking: Arc<dyn LinkingCapability>,
}

impl Rowt {
    pub fn new(linking: Arc<dyn LinkingCapability>) -> Self {
        Self {
            config: Arc::new(ConfigStore::default()),
            linking,
        }
    }

    /// Merge `update` into the stored configuration.
    pub fn initialize(&self, update: ConfigUpdate) -> Arc<SdkConfig> {
        let config = self.config.merge(&update);
        if config.debug {
            log::info!("initialized with config: {update:?}");
        }
        config
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<SdkConfig> {
        self.config.snapshot()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.linking.capabilities()
    }

    /// Whether [`Rowt::create_deep_link`] is available.
    pub fn supports_app_urls(&self) -> bool {
        self.capabilities().contains(Capabilities::CREATE_URL)
    }

    /// URL the app was launched or resumed with.
    ///
    /// Provider failures are logged (in debug mode) and reported as `None`.
    pub async fn get_initial_deep_link(&self) -> Option<String> {
        match self.linking.initial_url().await {
            Ok(url) => {
                if let Some(url) = &url {
                    if self.config.is_debug() {
                        log::info!("initial deep link: {url}");
                    }
                }
                url
            }
            Err(err) => {
                if self.config.is_debug() {
                    log::error!("error getting initial deep link: {err}");
                }
                None
            }
        }
    }

    /// Call `handler` with every deep link received from now on.
    pub fn add_deep_link_listener<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        if self.config.is_debug() {
            log::info!("adding deep link listener");
        }

        let config = Arc::clone(&self.config);
        let wrapped: UrlHandler = Arc::new(move |url: &str| {
            if config.is_debug() {
                log::info!("received deep link: {url}");
            }
            handler(url);
        });
        self.linking.subscribe(wrapped)
    }

    pub fn parse_deep_link(&self, url: &str) -> Result<ParsedDeepLink> {
        parse_deep_link(url)
    }

    /// Build an app URL. Requires [`Capabilities::CREATE_URL`].
    pub fn create_deep_link(&self, path: &str, params: &BTreeMap<String, String>) -> Result<String> {
        self.require(Capabilities::CREATE_URL)?;
        self.linking.create_url(path, params)
    }

    pub async fn can_open_url(&self, url: &str) -> Result<bool> {
        self.require(Capabilities::CAN_OPEN_URL)?;
        self.linking.can_open_url(url).await
    }

    pub async fn open_url(&self, url: &str) -> Result<()> {
        self.require(Capabilities::OPEN_URL)?;
        self.linking.open_url(url).await
    }

    /// A shortlink client for `project_id` on the configured server with
    /// the configured API key.
    pub fn link(&self, project_id: &str, options: LinkOptions) -> Result<LinkClient> {
        let config = self.config.snapshot();
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| RowtError::Configuration("baseURL is not configured".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RowtError::Configuration("apiKey is not configured".to_string()))?;

        LinkClient::new(LinkConfig::new(base_url, api_key, project_id), options)
    }

    fn require(&self, capability: Capabilities) -> Result<()> {
        if self.capabilities().contains(capability) {
            Ok(())
        } else {
            Err(unsupported(capability))
        }
    }
}

impl std::fmt::Debug for Rowt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rowt")
            .field("config", &self.config.snapshot())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
