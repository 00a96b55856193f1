//! Linking provider for runtimes that manage app URLs.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rowt_core::{build_app_url, Capabilities, Result, RowtError};

use super::{LinkingCapability, ListenerRegistry, Subscription, UrlHandler};

/// Hands URLs that do not belong to the app to the platform.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn can_open(&self, url: &str) -> Result<bool>;
    async fn open(&self, url: &str) -> Result<()>;
}

/// Provider with a registered app URL prefix such as `myapp://`.
///
/// Supports app-URL generation. URLs under the app's own prefix are
/// opened by delivering them to the provider's listeners; anything else
/// goes to the [`UrlOpener`], when one is installed.
pub struct ManagedLinking {
    prefix: String,
    initial_url: Option<String>,
    listeners: ListenerRegistry,
    opener: Option<Arc<dyn UrlOpener>>,
}

impl ManagedLinking {
    /// Fails with [`RowtError::Configuration`] on an empty prefix.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            return Err(RowtError::Configuration("app URL prefix is required".to_string()));
        }
        Ok(Self {
            prefix,
            initial_url: None,
            listeners: ListenerRegistry::new(),
            opener: None,
        })
    }

    pub fn with_initial_url(mut self, url: impl Into<String>) -> Self {
        self.initial_url = Some(url.into());
        self
    }

    pub fn with_opener(mut self, opener: Arc<dyn UrlOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Deliver a URL event from the runtime to every listener.
    pub fn emit(&self, url: &str) -> usize {
        self.listeners.dispatch(url)
    }

    fn is_own_url(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }
}

impl std::fmt::Debug for ManagedLinking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedLinking")
            .field("prefix", &self.prefix)
            .field("listeners", &self.listeners)
            .field("has_opener", &self.opener.is_some())
            .finish()
    }
}

#[async_trait]
impl LinkingCapability for ManagedLinking {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    async fn initial_url(&self) -> Result<Option<String>> {
        Ok(self.initial_url.clone())
    }

    fn subscribe(&self, handler: UrlHandler) -> Subscription {
        self.listeners.add(handler)
    }

    fn create_url(&self, path: &str, params: &BTreeMap<String, String>) -> Result<String> {
        Ok(build_app_url(&self.prefix, path, params))
    }

    async fn can_open_url(&self, url: &str) -> Result<bool> {
        if self.is_own_url(url) {
            return Ok(true);
        }
        match &self.opener {
            Some(opener) => opener.can_open(url).await,
            None => Ok(false),
        }
    }

    async fn open_url(&self, url: &str) -> Result<()> {
        if self.is_own_url(url) {
            self.emit(url);
            return Ok(());
        }
        match &self.opener {
            Some(opener) => opener.open(url).await,
            None => Err(RowtError::Linking(format!("no handler available to open {url}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct HttpOnly {
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UrlOpener for HttpOnly {
        async fn can_open(&self, url: &str) -> Result<bool> {
            Ok(url.starts_with("https://"))
        }

        async fn open(&self, url: &str) -> Result<()> {
            self.opened.lock().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_requires_prefix() {
        assert!(matches!(ManagedLinking::new(" "), Err(RowtError::Configuration(_))));
    }

    #[test]
    fn test_create_url() {
        let linking = ManagedLinking::new("myapp://").unwrap();
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "42".to_string());
        assert_eq!(linking.create_url("/profile", &params).unwrap(), "myapp://profile?id=42");
        assert_eq!(linking.capabilities(), Capabilities::all());
    }

    #[tokio::test]
    async fn test_initial_url() {
        let linking = ManagedLinking::new("myapp://").unwrap();
        assert_eq!(linking.initial_url().await.unwrap(), None);

        let linking = linking.with_initial_url("myapp://home");
        assert_eq!(linking.initial_url().await.unwrap().as_deref(), Some("myapp://home"));
        assert_eq!(linking.initial_url().await.unwrap().as_deref(), Some("myapp://home"));
    }

    #[tokio::test]
    async fn test_open_own_url_dispatches() {
        let linking = ManagedLinking::new("myapp://").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = linking.subscribe(Arc::new(move |url: &str| sink.lock().push(url.to_string())));

        assert!(linking.can_open_url("myapp://cart").await.unwrap());
        linking.open_url("myapp://cart").await.unwrap();
        assert_eq!(*seen.lock(), vec!["myapp://cart"]);
    }

    #[tokio::test]
    async fn test_external_urls_need_opener() {
        let linking = ManagedLinking::new("myapp://").unwrap();
        assert!(!linking.can_open_url("https://example.com").await.unwrap());
        assert!(matches!(
            linking.open_url("https://example.com").await,
            Err(RowtError::Linking(_))
        ));

        let opener = Arc::new(HttpOnly { opened: Mutex::new(Vec::new()) });
        let linking = linking.with_opener(opener.clone());
        assert!(linking.can_open_url("https://example.com").await.unwrap());
        assert!(!linking.can_open_url("ftp://example.com").await.unwrap());
        linking.open_url("https://example.com").await.unwrap();
        assert_eq!(*opener.opened.lock(), vec!["https://example.com"]);
    }
}
