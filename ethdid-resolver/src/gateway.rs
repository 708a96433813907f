//! Gateway client for `.well-known/atproto-did` lookups.
//!
//! An ENS name like `alice.eth` is served by the gateway host
//! `alice.eth.link`, which proxies the content the name points at.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use ethdid_core::constants::{DEFAULT_GATEWAY_URL_TEMPLATE, DOMAIN_PLACEHOLDER, GATEWAY_TIMEOUT};
use ethdid_core::error::{EthDidError, Result};
use ethdid_core::traits::DidSource;
use ethdid_core::types::{EnsDomain, LookupFailure, LookupResult};

/// Gateway client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// URL with a `{domain}` placeholder
    pub url_template: String,
    /// Bound on a whole lookup, body included
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_GATEWAY_URL_TEMPLATE.into(),
            timeout: GATEWAY_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Creates a configuration with the given URL template.
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            ..Default::default()
        }
    }

    /// Overrides the lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reads DID records through the gateway. One GET per lookup, no retries.
#[derive(Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl GatewayClient {
    /// Creates a client for the public `eth.link` gateway.
    pub fn new() -> Result<Self> {
        Self::with_config(GatewayConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: GatewayConfig) -> Result<Self> {
        if !config.url_template.contains(DOMAIN_PLACEHOLDER) {
            return Err(EthDidError::ConfigError(format!(
                "gateway URL template must contain {}: {}",
                DOMAIN_PLACEHOLDER, config.url_template
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EthDidError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Builds the record URL for `domain`.
    pub fn record_url(&self, domain: &EnsDomain) -> Result<Url> {
        let raw = self
            .config
            .url_template
            .replace(DOMAIN_PLACEHOLDER, domain.as_str());

        Url::parse(&raw).map_err(|e| EthDidError::InvalidGatewayUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }

    fn transport_failure(&self, domain: &EnsDomain, err: &reqwest::Error) -> LookupResult {
        if err.is_timeout() {
            LookupResult::not_found(
                LookupFailure::GatewayFailure,
                format!(
                    "Timeout after {:?} while querying gateway for '{}'",
                    self.config.timeout, domain
                ),
            )
        } else if err.is_connect() {
            LookupResult::not_found(
                LookupFailure::NoDomain,
                format!("ENS domain '{}' could not be reached through the gateway: {}", domain, err),
            )
        } else {
            LookupResult::not_found(
                LookupFailure::GatewayFailure,
                format!("Failed to query gateway for '{}': {}", domain, err),
            )
        }
    }
}

#[async_trait]
impl DidSource for GatewayClient {
    #[instrument(skip_all, fields(domain = %domain))]
    async fn lookup(&self, domain: &EnsDomain) -> LookupResult {
        let url = match self.record_url(domain) {
            Ok(url) => url,
            Err(e) => return LookupResult::not_found(LookupFailure::GatewayFailure, e.to_string()),
        };

        debug!(%url, "Querying gateway");

        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return self.transport_failure(domain, &e),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return LookupResult::not_found(
                LookupFailure::NoDomain,
                format!("ENS domain '{}' is not registered", domain),
            );
        }
        if !status.is_success() {
            return LookupResult::not_found(
                LookupFailure::GatewayFailure,
                format!("Gateway returned status {}", status.as_u16()),
            );
        }

        let result = match response.text().await {
            Ok(body) => LookupResult::from_record(domain, &body),
            Err(e) => self.transport_failure(domain, &e),
        };

        debug!(found = result.is_found(), error_type = ?result.error_type(), "Gateway lookup complete");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethdid_core::types::ErrorType;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RECORD_PATH: &str = "/alice.eth/.well-known/atproto-did";

    fn domain() -> EnsDomain {
        EnsDomain::parse("alice.eth").unwrap()
    }

    fn client_for(server: &MockServer) -> GatewayClient {
        let template = format!("{}/{{domain}}/.well-known/atproto-did", server.uri());
        GatewayClient::with_config(GatewayConfig::new(template)).unwrap()
    }

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RECORD_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.url_template.contains("{domain}.link"));
    }

    #[test]
    fn test_record_url() {
        let client = GatewayClient::new().unwrap();
        let url = client.record_url(&domain()).unwrap();
        assert_eq!(url.as_str(), "https://alice.eth.link/.well-known/atproto-did");
    }

    #[test]
    fn test_template_requires_placeholder() {
        let result = GatewayClient::with_config(GatewayConfig::new("https://example.com/"));
        assert!(matches!(result, Err(EthDidError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_found() {
        let server = serve(200, "did:plc:abc123\n").await;
        let result = client_for(&server).lookup(&domain()).await;

        assert_eq!(result.did().map(|d| d.as_str()), Some("did:plc:abc123"));
    }

    #[tokio::test]
    async fn test_404_is_no_domain() {
        let server = serve(404, "Not Found").await;
        let result = client_for(&server).lookup(&domain()).await;

        assert_eq!(result.error_type(), Some(ErrorType::NoDomain));
        assert!(result.message().unwrap().contains("alice.eth"));
    }

    #[tokio::test]
    async fn test_empty_body_is_invalid_did() {
        let server = serve(200, "   ").await;
        let result = client_for(&server).lookup(&domain()).await;

        assert_eq!(result.error_type(), Some(ErrorType::InvalidDid));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_did() {
        let server = serve(200, "<html><body>ENS landing page</body></html>").await;
        let result = client_for(&server).lookup(&domain()).await;

        assert_eq!(result.error_type(), Some(ErrorType::InvalidDid));
    }

    #[tokio::test]
    async fn test_server_error_is_gateway_failure() {
        let server = serve(502, "Bad Gateway").await;
        let result = client_for(&server).lookup(&domain()).await;

        assert_eq!(result.error_type(), Some(ErrorType::GatewayFailure));
        assert_eq!(result.message(), Some("Gateway returned status 502"));
    }

    #[tokio::test]
    async fn test_timeout_is_gateway_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RECORD_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("did:plc:abc123")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let template = format!("{}/{{domain}}/.well-known/atproto-did", server.uri());
        let config = GatewayConfig::new(template).with_timeout(Duration::from_millis(50));
        let result = GatewayClient::with_config(config).unwrap().lookup(&domain()).await;

        assert_eq!(result.error_type(), Some(ErrorType::GatewayFailure));
        assert!(result.message().unwrap().contains("50ms"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_no_domain() {
        // Nothing listens on port 1.
        let config = GatewayConfig::new("http://127.0.0.1:1/{domain}/.well-known/atproto-did");
        let result = GatewayClient::with_config(config).unwrap().lookup(&domain()).await;

        assert_eq!(result.error_type(), Some(ErrorType::NoDomain));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_gateway_failure() {
        let config = GatewayConfig::new("http://exa mple.com/{domain}");
        let result = GatewayClient::with_config(config).unwrap().lookup(&domain()).await;

        assert_eq!(result.error_type(), Some(ErrorType::GatewayFailure));
    }
}
