//! HTTP client for resolving flight callsigns to airport routes.

use crate::types::ResolvedRoute;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL},
    Client, RequestBuilder, StatusCode,
};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned error status: {status}")]
    ServerError { status: StatusCode },
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },
}

/// Source of route metadata for a callsign.
///
/// `Ok(None)` means the callsign is unknown or the payload was not a route.
#[allow(async_fn_in_trait)]
pub trait RouteResolver {
    async fn resolve(&self, callsign: &str) -> Result<Option<ResolvedRoute>, ClientError>;
}

/// Configuration for the route client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the routes API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://opensky-network.org";

    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the OpenSky routes endpoint.
pub struct RouteClient {
    client: Client,
    config: ClientConfig,
}

impl RouteClient {
    /// Create a new route client.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("routegraph/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { client, config })
    }

    fn route_request(&self, callsign: &str) -> RequestBuilder {
        let callsign = callsign.trim().to_ascii_uppercase();
        self.client
            .get(format!("{}/api/routes", self.config.base_url))
            .query(&[("callsign", callsign)])
    }

    /// Fetch the route for a callsign.
    pub async fn fetch(&self, callsign: &str) -> Result<Option<ResolvedRoute>, ClientError> {
        let request = self.route_request(callsign).build()?;
        tracing::debug!("Fetching: {}", request.url());

        let response = self.client.execute(request).await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                Ok(parse_route(&body))
            }
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs);

                Err(ClientError::RateLimited { retry_after })
            }
            status => Err(ClientError::ServerError { status }),
        }
    }
}

impl RouteResolver for RouteClient {
    async fn resolve(&self, callsign: &str) -> Result<Option<ResolvedRoute>, ClientError> {
        self.fetch(callsign).await
    }
}

/// Decode a routes payload. Anything that is not a route object yields `None`.
pub fn parse_route(body: &str) -> Option<ResolvedRoute> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ResolvedRoute>(body) {
        Ok(route) => Some(route),
        Err(e) => {
            tracing::debug!("Unrecognised route payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACA738: &str = r#"{"callsign":"ACA738","route":["KSFO","CYYZ"],"updateTime":1593544124000,"operatorIata":"AC","flightNumber":738}"#;

    async fn client_for(server: &MockServer) -> RouteClient {
        RouteClient::new(ClientConfig::new().with_base_url(server.uri())).unwrap()
    }

    fn url_for(client: &RouteClient, callsign: &str) -> String {
        client
            .route_request(callsign)
            .build()
            .unwrap()
            .url()
            .to_string()
    }

    #[test]
    fn test_route_url() {
        let client =
            RouteClient::new(ClientConfig::new().with_base_url("http://localhost:8080/")).unwrap();
        assert_eq!(
            url_for(&client, " aca738 "),
            "http://localhost:8080/api/routes?callsign=ACA738"
        );
    }

    #[test]
    fn test_route_url_encodes_callsign() {
        let client =
            RouteClient::new(ClientConfig::new().with_base_url("http://localhost:8080")).unwrap();
        assert_eq!(
            url_for(&client, "ab&c #1"),
            "http://localhost:8080/api/routes?callsign=AB%26C+%231"
        );
    }

    #[test]
    fn test_parse_route_rejects_garbage() {
        assert!(parse_route("").is_none());
        assert!(parse_route("<html>oops</html>").is_none());
        assert!(parse_route(r#"{"error":"nope"}"#).is_none());
        assert_eq!(parse_route(ACA738).unwrap().route, vec!["KSFO", "CYYZ"]);
    }

    #[tokio::test]
    async fn test_fetch_resolved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/routes"))
            .and(query_param("callsign", "ACA738"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACA738))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let route = client.resolve("aca738").await.unwrap().unwrap();
        assert_eq!(route.callsign, "ACA738");
        assert_eq!(route.flight_number, Some(738));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/routes"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.resolve("ZZZ999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        match client.resolve("ACA738").await {
            Err(ClientError::RateLimited { retry_after }) => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("expected rate limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(
            client.resolve("ACA738").await,
            Err(ClientError::ServerError { status }) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }
}
