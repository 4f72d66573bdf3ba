//! Outbound provider clients
//!
//! Each provider module only knows how to shape its one request. Sending,
//! timing, error classification and status mapping live in
//! [`ProviderClient::relay`] so the four integrations behave identically.

use std::fmt;
use std::time::{Duration, Instant};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::GatewayError;
use crate::config::{GatewayConfig, ProviderConfig};

pub mod amadeus;
pub mod geoapify;
pub mod open_meteo;
pub mod openai;

pub use amadeus::AmadeusClient;
pub use geoapify::GeoapifyClient;
pub use open_meteo::OpenMeteoClient;
pub use openai::OpenAiClient;

const USER_AGENT: &str = concat!("travelai-gateway/", env!("CARGO_PKG_VERSION"));
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Query parameters whose values must never reach the logs
const SECRET_PARAMS: &[&str] = &["apiKey"];

/// The four upstream services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provider {
    #[serde(rename = "amadeus")]
    Amadeus,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "geoapify")]
    Geoapify,
    #[serde(rename = "open-meteo")]
    OpenMeteo,
}

impl Provider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Amadeus => "amadeus",
            Provider::OpenAi => "openai",
            Provider::Geoapify => "geoapify",
            Provider::OpenMeteo => "open-meteo",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider's answer, relayed to the caller without modification
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        (gateway_status(self.status), Json(self.body)).into_response()
    }
}

/// Map an upstream status onto the status returned to the caller.
///
/// Success and error classes are preserved so callers can tell a provider
/// rejection apart from a gateway failure. Informational and redirect
/// statuses have no meaning for a relayed JSON body.
#[must_use]
pub fn gateway_status(upstream: StatusCode) -> StatusCode {
    if upstream.is_success() || upstream.is_client_error() || upstream.is_server_error() {
        upstream
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// Render `url` for logging with secret query values masked
#[must_use]
pub fn redacted_url(url: &Url) -> String {
    let mut url = url.clone();
    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if SECRET_PARAMS.contains(&key.as_ref()) {
                    "***".to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}

/// HTTP plumbing shared by every provider integration
#[derive(Debug, Clone)]
pub struct ProviderClient {
    provider: Provider,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ProviderClient {
    /// Create a client bound to one provider's endpoint and timeout
    pub fn new(provider: Provider, config: &ProviderConfig) -> Result<Self, GatewayError> {
        let timeout = config.timeout();
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::client(format!("Failed to create {provider} client: {e}")))?;

        Ok(Self {
            provider,
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Send `request` and capture the provider's status and JSON body.
    ///
    /// Upstream error statuses are not errors here; only transport failures
    /// and unreadable bodies are.
    #[instrument(name = "provider.relay", skip_all, fields(provider = %self.provider))]
    pub async fn relay(&self, request: RequestBuilder) -> Result<UpstreamResponse, GatewayError> {
        let request = request.build().map_err(|e| {
            GatewayError::client(format!("Invalid {} request: {}", self.provider, e.without_url()))
        })?;

        let method = request.method().clone();
        debug!(%method, url = %redacted_url(request.url()), "Calling provider");
        let start_time = Instant::now();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| GatewayError::from_upstream(self.provider, self.timeout, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::from_upstream(self.provider, self.timeout, e))?;

        let elapsed = start_time.elapsed();
        info!(
            %method,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Provider responded"
        );

        if elapsed > SLOW_RESPONSE {
            warn!("Slow provider response: {:.3}s", elapsed.as_secs_f64());
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| GatewayError::UpstreamBody {
            provider: self.provider,
            status,
            message: e.to_string(),
        })?;

        Ok(UpstreamResponse { status, body })
    }
}

/// One client per provider, built once from configuration
#[derive(Clone)]
pub struct Providers {
    pub amadeus: AmadeusClient,
    pub openai: OpenAiClient,
    pub geoapify: GeoapifyClient,
    pub open_meteo: OpenMeteoClient,
}

impl Providers {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let credentials = &config.credentials;
        Ok(Self {
            amadeus: AmadeusClient::new(&config.amadeus, &credentials.amadeus_api_key)?,
            openai: OpenAiClient::new(&config.openai, &credentials.openai_api_key)?,
            geoapify: GeoapifyClient::new(&config.geoapify, &credentials.geoapify_api_key)?,
            open_meteo: OpenMeteoClient::new(&config.open_meteo)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::OK, StatusCode::OK)]
    #[case(StatusCode::CREATED, StatusCode::CREATED)]
    #[case(StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::TOO_MANY_REQUESTS, StatusCode::TOO_MANY_REQUESTS)]
    #[case(StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(StatusCode::MOVED_PERMANENTLY, StatusCode::BAD_GATEWAY)]
    #[case(StatusCode::CONTINUE, StatusCode::BAD_GATEWAY)]
    fn test_gateway_status(#[case] upstream: StatusCode, #[case] expected: StatusCode) {
        assert_eq!(gateway_status(upstream), expected);
    }

    #[test]
    fn test_redacted_url_masks_api_key() {
        let url = Url::parse(
            "https://api.geoapify.com/v2/places?categories=tourism.sights&filter=place%3ARome&apiKey=secret",
        )
        .unwrap();
        let redacted = redacted_url(&url);
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("apiKey=***") || redacted.contains("apiKey=%2A%2A%2A"));
        assert!(redacted.contains("categories=tourism.sights"));
    }

    #[test]
    fn test_redacted_url_without_query() {
        let url = Url::parse("https://api.openai.com/v1/completions").unwrap();
        assert_eq!(redacted_url(&url), "https://api.openai.com/v1/completions");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ProviderConfig {
            base_url: "http://localhost:9000/".to_string(),
            timeout_seconds: 3,
        };
        let client = ProviderClient::new(Provider::OpenMeteo, &config).unwrap();
        assert_eq!(client.url("/v1/forecast"), "http://localhost:9000/v1/forecast");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::OpenAi.to_string(), "openai");
        assert_eq!(serde_json::to_value(Provider::OpenMeteo).unwrap(), "open-meteo");
    }

    #[test]
    fn test_providers_from_default_config() {
        assert!(Providers::from_config(&GatewayConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_build_error_does_not_leak_query() {
        let config = ProviderConfig {
            base_url: "http://localhost:9000".to_string(),
            timeout_seconds: 3,
        };
        let client = ProviderClient::new(Provider::Geoapify, &config).unwrap();
        let request = client
            .get("/v2/places?apiKey=secret-key")
            .header("x-bad\nheader", "value");

        let err = client.relay(request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Client { .. }));
        assert!(!err.to_string().contains("secret-key"));
    }
}
