//! Client error types.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the messages client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/placeholder credential or an invalid request parameter.
    /// Always raised before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The service rejected the credential (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The service signalled throttling (HTTP 429). The facade never
    /// retries; callers decide whether to back off using `retry_after`.
    #[error("rate limited by the service")]
    RateLimit {
        /// Seconds from the `retry-after` header, when the service sent one.
        retry_after: Option<u64>,
    },

    /// Any other non-2xx outcome (500 `api_error`, 529 `overloaded_error`, …).
    #[error("service returned HTTP {status}: {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Message from the error envelope, or the raw body.
        message: String,
    },

    /// Transport-level failure before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The response body or a stream event could not be parsed.
    #[error("failed to parse service response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Wire-format error envelope: `{"type":"error","error":{"type":...,"message":...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

/// Inner error object of the envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Extract the error detail from a response body, if it is a well-formed
/// envelope.
pub(crate) fn parse_error_body(body: &str) -> Option<ErrorDetail> {
    serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error)
}

/// Map the service's error `type` string onto the taxonomy. Used for
/// mid-stream `error` events, where no HTTP status accompanies the payload.
pub(crate) fn classify_wire_error(kind: &str, message: String) -> ApiError {
    match kind {
        "authentication_error" | "permission_error" => ApiError::Authentication(message),
        "rate_limit_error" => ApiError::RateLimit { retry_after: None },
        "overloaded_error" => ApiError::Service {
            status: 529,
            message,
        },
        _ => ApiError::Service {
            status: 500,
            message,
        },
    }
}
