//! Error types and handling for the `TravelAI` gateway
//!
//! Every failure a caller can see is rendered as a JSON error descriptor.
//! Upstream error bodies that are valid JSON are not errors at this level;
//! they are relayed with their status by [`crate::providers`].

use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::providers::Provider;

/// Stable machine-readable error codes sent to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidBody,
    MissingField,
    NotFound,
    MethodNotAllowed,
    UpstreamTimeout,
    UpstreamUnavailable,
    UpstreamInvalidResponse,
    ConfigError,
    InternalError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidBody => "INVALID_BODY",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorCode::UpstreamInvalidResponse => "UPSTREAM_INVALID_RESPONSE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Inbound body is not a JSON object of the expected shape
    #[error("Malformed request body: {message}")]
    MalformedBody { message: String },

    /// Inbound body exceeds the configured size limit
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Inbound body lacks a required field, or it is blank
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("No route for {path}")]
    RouteNotFound { path: String },

    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: String },

    /// Provider did not answer within its configured timeout
    #[error("{provider} did not respond within {}s", timeout.as_secs())]
    UpstreamTimeout {
        provider: Provider,
        timeout: Duration,
    },

    /// DNS, connect or reset failures talking to a provider
    #[error("Failed to reach {provider}: {message}")]
    UpstreamTransport { provider: Provider, message: String },

    /// Provider answered with something that is not JSON
    #[error("{provider} returned a non-JSON body (HTTP {status}): {message}")]
    UpstreamBody {
        provider: Provider,
        status: StatusCode,
        message: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {message}")]
    Client { message: String },
}

impl GatewayError {
    /// Create a new malformed body error
    pub fn malformed_body<S: Into<String>>(message: S) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    /// Create a new missing field error
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new HTTP client error
    pub fn client<S: Into<String>>(message: S) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Classify a `reqwest` failure on the way to `provider`
    #[must_use]
    pub fn from_upstream(provider: Provider, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamTimeout { provider, timeout }
        } else {
            Self::UpstreamTransport {
                provider,
                message: err.without_url().to_string(),
            }
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::MalformedBody { .. } | GatewayError::BodyTooLarge { .. } => {
                ErrorCode::InvalidBody
            }
            GatewayError::MissingField { .. } => ErrorCode::MissingField,
            GatewayError::RouteNotFound { .. } => ErrorCode::NotFound,
            GatewayError::MethodNotAllowed { .. } => ErrorCode::MethodNotAllowed,
            GatewayError::UpstreamTimeout { .. } => ErrorCode::UpstreamTimeout,
            GatewayError::UpstreamTransport { .. } => ErrorCode::UpstreamUnavailable,
            GatewayError::UpstreamBody { .. } => ErrorCode::UpstreamInvalidResponse,
            GatewayError::Config { .. } => ErrorCode::ConfigError,
            GatewayError::Client { .. } => ErrorCode::InternalError,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            GatewayError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::MissingField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::UpstreamTransport { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamBody { status, .. } => {
                if status.is_client_error() || status.is_server_error() {
                    *status
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            GatewayError::Config { .. } | GatewayError::Client { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    #[must_use]
    pub fn provider(&self) -> Option<Provider> {
        match self {
            GatewayError::UpstreamTimeout { provider, .. }
            | GatewayError::UpstreamTransport { provider, .. }
            | GatewayError::UpstreamBody { provider, .. } => Some(*provider),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::MalformedBody { message } => format!("Invalid request body: {message}"),
            GatewayError::BodyTooLarge { limit } => {
                format!("Request body must not exceed {limit} bytes")
            }
            GatewayError::MissingField { field } => {
                format!("Field '{field}' is required and must not be empty")
            }
            GatewayError::RouteNotFound { .. } | GatewayError::MethodNotAllowed { .. } => {
                self.to_string()
            }
            GatewayError::UpstreamTimeout { provider, .. } => {
                format!("The {provider} provider took too long to respond")
            }
            GatewayError::UpstreamTransport { provider, .. } => {
                format!("Unable to reach the {provider} provider")
            }
            GatewayError::UpstreamBody { provider, .. } => {
                format!("The {provider} provider returned an unreadable response")
            }
            GatewayError::Config { .. } | GatewayError::Client { .. } => {
                "Internal gateway error".to_string()
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDescriptor,
}

#[derive(Serialize)]
struct ErrorDescriptor {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<Provider>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: ErrorDescriptor {
                code: self.code(),
                message: self.user_message(),
                provider: self.provider(),
            },
        };
        (status, Json(body)).into_response()
    }
}
