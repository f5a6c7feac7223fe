//! The messages client — one outbound call per operation.

use std::time::Instant;

use reqwest::StatusCode;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{parse_error_body, ApiError, Result};
use crate::stream::MessageStream;
use crate::types::{MessageRequest, MessagesResponse};

/// Client for the messages endpoint.
///
/// Holds the credential and a shared HTTP connection pool; no other state is
/// retained between calls. Construction fails fast on an unusable credential,
/// so configuration errors always surface before any network I/O.
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.config.redacted_key())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the credential is empty or the
    /// documentation placeholder.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    /// Create a client with the credential from `ANTHROPIC_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the variable is unset, empty, or a
    /// placeholder.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a conversation and wait for the complete response.
    ///
    /// Exactly one outbound call; no retry is performed. A rate-limited call
    /// returns [`ApiError::RateLimit`] and leaves any backoff to the caller.
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] for an empty model or zero `max_tokens` (before
    /// any network call), [`ApiError::Authentication`] /
    /// [`ApiError::RateLimit`] / [`ApiError::Service`] for non-2xx responses,
    /// [`ApiError::Network`] on transport failure, [`ApiError::Parse`] on a
    /// malformed body.
    pub async fn messages(&self, request: &MessageRequest) -> Result<MessagesResponse> {
        validate_request(request)?;
        let body = serde_json::to_value(request).map_err(|e| ApiError::Parse(e.to_string()))?;

        let start = Instant::now();
        let response = self.send(&body).await?;
        let parsed: MessagesResponse = response.json().await?;

        debug!(
            model = %request.model,
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            stop_reason = parsed.stop_reason.as_deref().unwrap_or(""),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "message completed"
        );

        Ok(parsed)
    }

    /// Send a conversation and return a lazy stream of text fragments.
    ///
    /// The request itself can fail with the same error kinds as
    /// [`Client::messages`]; failures after the stream is established surface
    /// from [`MessageStream::next`] instead. Dropping the stream early
    /// releases the underlying connection.
    ///
    /// # Errors
    ///
    /// Same as [`Client::messages`] for the initial call.
    pub async fn stream(&self, request: &MessageRequest) -> Result<MessageStream> {
        validate_request(request)?;
        let mut body = serde_json::to_value(request).map_err(|e| ApiError::Parse(e.to_string()))?;
        body["stream"] = serde_json::Value::Bool(true);

        let response = self.send(&body).await?;
        debug!(model = %request.model, "stream established");
        Ok(MessageStream::new(response))
    }

    /// POST the body and map any non-2xx outcome onto the error taxonomy.
    async fn send(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}/v1/messages", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let text = response.text().await.unwrap_or_default();
        Err(status_to_error(status, retry_after, &text))
    }
}

/// Reject invalid parameters before any network call.
fn validate_request(request: &MessageRequest) -> Result<()> {
    if request.model.trim().is_empty() {
        return Err(ApiError::Config(
            "model identifier must not be empty".to_string(),
        ));
    }
    if request.max_tokens == 0 {
        return Err(ApiError::Config(
            "max_tokens must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Map an HTTP status + body onto the error taxonomy.
fn status_to_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> ApiError {
    let message = parse_error_body(body)
        .map(|d| d.message)
        .unwrap_or_else(|| body.trim().to_string());

    match status.as_u16() {
        401 | 403 => ApiError::Authentication(message),
        429 => ApiError::RateLimit { retry_after },
        s => ApiError::Service { status: s, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn empty_model_rejected_before_network() {
        let request = MessageRequest::new("", vec![Message::user("q")]);
        assert!(matches!(
            validate_request(&request),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let request =
            MessageRequest::new("claude-3-haiku-20240307", vec![Message::user("q")])
                .with_max_tokens(0);
        assert!(matches!(
            validate_request(&request),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn status_mapping_matches_taxonomy() {
        let auth = status_to_error(StatusCode::UNAUTHORIZED, None, "");
        assert!(matches!(auth, ApiError::Authentication(_)));

        let limited = status_to_error(StatusCode::TOO_MANY_REQUESTS, Some(60), "");
        assert!(matches!(
            limited,
            ApiError::RateLimit {
                retry_after: Some(60)
            }
        ));

        let overloaded = status_to_error(
            StatusCode::from_u16(529).expect("valid status"),
            None,
            r#"{"type":"error","error":{"type":"overloaded_error","message":"busy"}}"#,
        );
        match overloaded {
            ApiError::Service { status, message } => {
                assert_eq!(status, 529);
                assert_eq!(message, "busy");
            }
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[test]
    fn placeholder_credential_never_reaches_the_wire() {
        let config = ClientConfig::new(crate::config::PLACEHOLDER_KEY);
        assert!(matches!(Client::new(config), Err(ApiError::Config(_))));
    }
}
