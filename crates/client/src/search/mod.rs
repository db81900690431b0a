//! Client for the local search endpoint.
//!
//! ### Protocol
//!
//! - **Endpoint**: `http://127.0.0.1:8000/search` by default
//! - **Request**: `GET` with `query` (URL-encoded search text) and `type`
//!   (`web` | `news` | `image`) query parameters, no authentication.
//! - **Response**: a JSON document whose shape depends on `type`; see
//!   [`sift_core::SearchPayload`].
//!
//! The body is decoded whatever the HTTP status, so an endpoint that reports
//! an upstream problem as `{}` yields an empty result list rather than an
//! error. Only transport failures and non-JSON bodies are errors.

pub mod error;

pub use error::ClientError;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use url::Url;
use sift_core::{AppConfig, SearchPayload, SearchType};

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "sift/0.1";

/// Search client configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Full endpoint URL, including the `/search` path.
    pub endpoint: String,
    /// Request timeout; `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// User-agent string (default: sift/0.x).
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: sift_core::config::DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for SearchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { endpoint: config.endpoint.clone(), timeout: config.timeout(), user_agent: config.user_agent.clone() }
    }
}

/// Anything that can answer a search.
///
/// The terminal UI only talks to this trait, so tests can swap in a canned
/// backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, search_type: SearchType) -> Result<SearchPayload, ClientError>;
}

/// HTTP search client.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl SearchClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SearchConfig) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| ClientError::InvalidEndpoint(e.to_string()))?;

        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run one search against the endpoint.
    pub async fn search(&self, query: &str, search_type: SearchType) -> Result<SearchPayload, ClientError> {
        let start = Instant::now();

        tracing::debug!(endpoint = %self.endpoint, %search_type, "searching: query={}", query);

        let response = self
            .http
            .get(self.endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .query(&[("query", query), ("type", search_type.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "search endpoint returned an error status; decoding body anyway");
        }

        let bytes = response.bytes().await?;
        let payload = SearchPayload::from_slice(&bytes).map_err(|e| match e {
            sift_core::Error::DecodeFailure(msg) => ClientError::Decode(msg),
            other => ClientError::Decode(other.to_string()),
        })?;

        tracing::debug!("search completed in {:?}, {} bytes", start.elapsed(), bytes.len());

        Ok(payload)
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(&self, query: &str, search_type: SearchType) -> Result<SearchPayload, ClientError> {
        SearchClient::search(self, query, search_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned HTTP response; the handle yields the request head.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&head).into_owned()
        });

        (format!("http://{addr}/search"), handle)
    }

    fn client(endpoint: String) -> SearchClient {
        SearchClient::new(SearchConfig { endpoint, ..Default::default() }).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:8000/search");
        assert!(config.timeout.is_none());
        assert_eq!(config.user_agent, "sift/0.1");
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { endpoint: "http://localhost:1/search".into(), timeout_ms: Some(250), ..Default::default() };
        let config = SearchConfig::from(&app);
        assert_eq!(config.endpoint, "http://localhost:1/search");
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = SearchClient::new(SearchConfig { endpoint: "not a url".into(), ..Default::default() });
        assert!(matches!(result, Err(ClientError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn test_search_sends_encoded_params() {
        let (endpoint, server) = serve_once("200 OK", r#"{"news":{"results":[{"title":"n"}]}}"#).await;

        let payload = client(endpoint).search("cats & dogs", SearchType::News).await.unwrap();
        let (results, _) = payload.into_bucket(SearchType::News);
        assert_eq!(results.len(), 1);

        let head = server.await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /search?"), "{request_line}");
        assert!(request_line.contains("query=cats+%26+dogs"), "{request_line}");
        assert!(request_line.contains("type=news"), "{request_line}");
        assert!(head.to_ascii_lowercase().contains("user-agent: sift/0.1"));
    }

    #[tokio::test]
    async fn test_empty_query_is_sent() {
        let (endpoint, server) = serve_once("200 OK", r#"{"results":[]}"#).await;

        let payload = client(endpoint).search("", SearchType::Image).await.unwrap();
        assert!(payload.results.is_empty());

        let head = server.await.unwrap();
        assert!(head.lines().next().unwrap().contains("query=&type=image"));
    }

    #[tokio::test]
    async fn test_error_status_body_still_decoded() {
        let (endpoint, server) = serve_once("500 Internal Server Error", "{}").await;

        let payload = client(endpoint).search("x", SearchType::Web).await.unwrap();
        assert_eq!(payload, SearchPayload::default());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let (endpoint, server) = serve_once("404 Not Found", "Not Found").await;

        let result = client(endpoint).search("x", SearchType::Web).await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(format!("http://{addr}/search")).search("x", SearchType::Web).await;
        assert!(matches!(result, Err(ClientError::Network(_))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = SearchClient::new(SearchConfig {
            endpoint: format!("http://{addr}/search"),
            timeout: Some(Duration::from_millis(200)),
            ..Default::default()
        })
        .unwrap();

        let result = client.search("x", SearchType::Web).await;
        assert!(matches!(result, Err(ClientError::Timeout)));
    }

    #[tokio::test]
    async fn test_backend_trait_object() {
        let (endpoint, server) = serve_once("200 OK", r#"{"web":{"results":[{"title":"a"},{"title":"b"}]}}"#).await;

        let backend: Box<dyn SearchBackend> = Box::new(client(endpoint));
        let payload = backend.search("q", SearchType::Web).await.unwrap();
        assert_eq!(payload.web.unwrap().results.len(), 2);
        server.await.unwrap();
    }
}
