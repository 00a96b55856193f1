//! Short link creation against the Rowt server.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use rowt_core::{Result, RowtError};

use crate::options::{LinkConfig, LinkOptions, LinkPayload};

/// Prefix of every link creation error message.
pub const CREATE_LINK_ERROR_PREFIX: &str = "Failed to create link: ";

/// Underlying cause of a failed `createLink` call.
#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request failed with status code {}", .0.as_u16())]
    Status(StatusCode),
    #[error("{0}")]
    Body(String),
}

impl From<Failure> for RowtError {
    fn from(failure: Failure) -> Self {
        RowtError::LinkCreation(format!("{CREATE_LINK_ERROR_PREFIX}{failure}"))
    }
}

// =============================================================================
// URL Helpers
// =============================================================================

/// Give `server_url` an explicit scheme, defaulting to `http://`.
pub fn normalize_server_url(server_url: &str) -> String {
    if server_url.starts_with("http://") || server_url.starts_with("https://") {
        server_url.to_string()
    } else {
        format!("http://{server_url}")
    }
}

/// The final `/`-separated component of a shortlink.
///
/// # Examples
///
/// ```
/// use rowt_link::shortcode_from_shortlink;
///
/// assert_eq!(shortcode_from_shortlink("https://rowt.app/abcde"), "abcde");
/// ```
pub fn shortcode_from_shortlink(shortlink: &str) -> &str {
    match shortlink.rfind('/') {
        Some(pos) => &shortlink[pos + 1..],
        None => shortlink,
    }
}

/// Pull the shortlink out of a response body: a JSON string is decoded,
/// anything that is not JSON is taken literally.
fn read_shortlink(body: &str) -> std::result::Result<String, Failure> {
    let body = body.trim();
    if body.is_empty() {
        return Err(Failure::Body("empty response body".to_string()));
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(shortlink)) => Ok(shortlink),
        Ok(other) => Err(Failure::Body(format!(
            "expected a shortlink string in the response, got {other}"
        ))),
        Err(_) => Ok(body.to_string()),
    }
}

// =============================================================================
// Link Client
// =============================================================================

/// One shortlink to be created on a Rowt server.
///
/// The client is bound to its server, credentials and link metadata at
/// construction. After a successful [`LinkClient::create_link`] the
/// shortlink and its shortcode are available through the accessors.
#[derive(Debug)]
pub struct LinkClient {
    config: LinkConfig,
    options: LinkOptions,
    http: reqwest::Client,
    shortlink: Option<String>,
    shortcode: Option<String>,
}

impl LinkClient {
    /// Create a client. Fails with [`RowtError::Configuration`] when the
    /// server URL, API key, project id or target URL is empty.
    pub fn new(config: LinkConfig, options: LinkOptions) -> Result<Self> {
        config.validate()?;
        if options.url.trim().is_empty() {
            return Err(RowtError::Configuration("url is required".to_string()));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RowtError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            options,
            http,
            shortlink: None,
            shortcode: None,
        })
    }

    /// Replace the HTTP client, e.g. to impose a request timeout.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Full URL of the link creation endpoint.
    pub fn endpoint(&self) -> String {
        let base = normalize_server_url(&self.config.server_url);
        format!("{}/link", base.trim_end_matches('/'))
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    /// Create the shortlink with a single POST and remember the result.
    ///
    /// Any failure surfaces as [`RowtError::LinkCreation`] with a message
    /// starting with `Failed to create link: `. Nothing is retried.
    pub async fn create_link(&mut self) -> Result<String> {
        let endpoint = self.endpoint();
        log::debug!("creating shortlink for {} via {}", self.options.url, endpoint);

        match self.send(&endpoint).await {
            Ok(shortlink) => {
                let shortcode = shortcode_from_shortlink(&shortlink).to_string();
                log::debug!("created shortlink {shortlink} (shortcode {shortcode})");
                self.shortcode = Some(shortcode);
                self.shortlink = Some(shortlink.clone());
                Ok(shortlink)
            }
            Err(failure) => {
                let err = RowtError::from(failure);
                log::warn!("{err}");
                Err(err)
            }
        }
    }

    async fn send(&self, endpoint: &str) -> std::result::Result<String, Failure> {
        let payload = LinkPayload::new(&self.config, &self.options);
        let response = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::Status(status));
        }

        let body = response.text().await?;
        read_shortlink(&body)
    }

    /// Shortcode of the last created link.
    pub fn shortcode(&self) -> Option<&str> {
        self.shortcode.as_deref()
    }

    /// Shortlink of the last created link.
    pub fn shortlink(&self) -> Option<&str> {
        self.shortlink.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server_url: &str) -> LinkClient {
        LinkClient::new(
            LinkConfig::new(server_url, "key-123", "proj-1"),
            LinkOptions::new("https://example.com/item/1").title("Item 1"),
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(normalize_server_url("rowt.app"), "http://rowt.app");
        assert_eq!(normalize_server_url("localhost:3000"), "http://localhost:3000");
        assert_eq!(normalize_server_url("http://rowt.app"), "http://rowt.app");
        assert_eq!(normalize_server_url("https://rowt.app"), "https://rowt.app");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(client_for("rowt.app").endpoint(), "http://rowt.app/link");
        assert_eq!(client_for("https://rowt.app/").endpoint(), "https://rowt.app/link");
        assert_eq!(client_for("https://rowt.app/api").endpoint(), "https://rowt.app/api/link");
    }

    #[test]
    fn test_shortcode_from_shortlink() {
        assert_eq!(shortcode_from_shortlink("https://rowt.app/abcde"), "abcde");
        assert_eq!(shortcode_from_shortlink("https://rowt.app/x/y/z"), "z");
        assert_eq!(shortcode_from_shortlink("abcde"), "abcde");
        assert_eq!(shortcode_from_shortlink("https://rowt.app/"), "");
    }

    #[test]
    fn test_read_shortlink() {
        assert_eq!(read_shortlink("\"https://rowt.app/a\"").unwrap(), "https://rowt.app/a");
        assert_eq!(read_shortlink("https://rowt.app/a\n").unwrap(), "https://rowt.app/a");
        assert!(matches!(read_shortlink(""), Err(Failure::Body(_))));
        assert!(matches!(read_shortlink("  \n"), Err(Failure::Body(_))));
        assert!(matches!(read_shortlink("{\"a\":1}"), Err(Failure::Body(_))));
    }

    #[test]
    fn test_new_requires_configuration() {
        let err = LinkClient::new(LinkConfig::new("rowt.app", "", "proj"), LinkOptions::new("https://example.com"))
            .unwrap_err();
        assert!(matches!(err, RowtError::Configuration(_)));

        let err = LinkClient::new(LinkConfig::new("rowt.app", "key", "proj"), LinkOptions::new("")).unwrap_err();
        assert_eq!(err, RowtError::Configuration("url is required".to_string()));
    }

    #[test]
    fn test_accessors_empty_before_create() {
        let client = client_for("rowt.app");
        assert_eq!(client.shortlink(), None);
        assert_eq!(client.shortcode(), None);
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/link")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "projectId": "proj-1",
                "apiKey": "key-123",
                "url": "https://example.com/item/1",
                "title": "Item 1",
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body("\"https://rowt.app/abcde\"")
            .expect(1)
            .create_async()
            .await;

        let mut client = client_for(&server.url());
        let shortlink = client.create_link().await.unwrap();

        assert_eq!(shortlink, "https://rowt.app/abcde");
        assert_eq!(client.shortlink(), Some("https://rowt.app/abcde"));
        assert_eq!(client.shortcode(), Some("abcde"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_link_without_scheme() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/link")
            .with_status(200)
            .with_body("https://rowt.app/plain")
            .create_async()
            .await;

        let mut client = client_for(&server.host_with_port());
        assert_eq!(client.create_link().await.unwrap(), "https://rowt.app/plain");
        assert_eq!(client.shortcode(), Some("plain"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_link_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/link")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let mut client = client_for(&server.url());
        let err = client.create_link().await.unwrap_err();

        assert!(matches!(err, RowtError::LinkCreation(_)));
        assert_eq!(err.to_string(), "Failed to create link: Request failed with status code 500");
        assert_eq!(client.shortlink(), None);
        assert_eq!(client.shortcode(), None);
    }

    #[tokio::test]
    async fn test_create_link_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/link")
            .with_status(200)
            .create_async()
            .await;

        let mut client = client_for(&server.url());
        let err = client.create_link().await.unwrap_err();
        assert_eq!(err, RowtError::LinkCreation("Failed to create link: empty response body".to_string()));
        assert_eq!(client.shortlink(), None);
    }

    #[tokio::test]
    async fn test_create_link_transport_error() {
        // Nothing listens on the discard port
        let mut client = client_for("127.0.0.1:9");
        let err = client.create_link().await.unwrap_err();

        match err {
            RowtError::LinkCreation(message) => {
                assert!(message.starts_with(CREATE_LINK_ERROR_PREFIX));
                assert!(message.len() > CREATE_LINK_ERROR_PREFIX.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_attempt_keeps_previous_result() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("POST", "/link")
            .with_status(200)
            .with_body("\"https://rowt.app/first\"")
            .expect(1)
            .create_async()
            .await;

        let mut client = client_for(&server.url());
        client.create_link().await.unwrap();
        ok.remove_async().await;

        let _fail = server
            .mock("POST", "/link")
            .with_status(503)
            .create_async()
            .await;
        assert!(client.create_link().await.is_err());
        assert_eq!(client.shortcode(), Some("first"));
    }
}
