//! OpenAI-compatible chat completions client.

use super::ModelGateway;
use crate::config::{ModelTier, Settings};
use crate::errors::{ConfigurationError, UpstreamError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

/// Longest slice of an error body kept in an `UpstreamError` message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Gateway that calls an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenRouterGateway {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenRouterGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterGateway")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenRouterGateway {
    /// Builds a gateway from validated settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the settings are invalid (for example a
    /// missing API key) or the HTTP client cannot be built.
    pub fn from_settings(settings: &Settings, tier: ModelTier) -> Result<Self, ConfigurationError> {
        settings.validate()?;

        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ConfigurationError::invalid_value("http_client", e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            model: settings.model_for(tier).to_string(),
        })
    }

    /// Returns the model identifier sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the full completions URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ModelGateway for OpenRouterGateway {
    async fn generate(
        &self,
        prompt: &str,
        system_instructions: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, UpstreamError> {
        let body = request_body(&self.model, prompt, system_instructions, max_output_tokens, temperature);

        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::invalid_response(format!("response body is not JSON: {e}")))?;

        extract_content(&payload)
    }
}

fn request_body(
    model: &str,
    prompt: &str,
    system_instructions: &str,
    max_output_tokens: u32,
    temperature: f32,
) -> Value {
    let mut messages = Vec::with_capacity(2);
    if !system_instructions.is_empty() {
        messages.push(json!({"role": "system", "content": system_instructions}));
    }
    messages.push(json!({"role": "user", "content": prompt}));

    json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_output_tokens,
        "temperature": temperature,
    })
}

fn extract_content(payload: &Value) -> Result<String, UpstreamError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::invalid_response("missing choices[0].message.content"))
}

fn status_error(status: StatusCode, body: &str) -> UpstreamError {
    let detail = crate::utils::truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS);
    let message = format!("HTTP {}: {detail}", status.as_u16());

    let error = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::authentication(message),
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => UpstreamError::timeout(message),
        _ => UpstreamError::other(message),
    };
    error.with_status(status.as_u16())
}

fn transport_error(err: &reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::timeout(err.to_string())
    } else {
        UpstreamError::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UpstreamErrorKind;

    fn settings() -> Settings {
        Settings::default().with_api_key("sk-test-key-123456")
    }

    #[test]
    fn test_from_settings_requires_api_key() {
        let err = OpenRouterGateway::from_settings(&Settings::default(), ModelTier::Pro).unwrap_err();
        assert_eq!(err.code(), Some(crate::errors::codes::MISSING_CREDENTIAL));
    }

    #[test]
    fn test_from_settings_builds_endpoint_and_model() {
        let gateway = OpenRouterGateway::from_settings(
            &settings().with_base_url("https://example.test/v1/"),
            ModelTier::Lite,
        )
        .unwrap();

        assert_eq!(gateway.endpoint(), "https://example.test/v1/chat/completions");
        assert_eq!(gateway.model(), "google/gemini-2.5-flash-lite");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let gateway = OpenRouterGateway::from_settings(&settings(), ModelTier::Pro).unwrap();
        let rendered = format!("{gateway:?}");
        assert!(!rendered.contains("sk-test-key"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("m", "user text", "persona", 512, 0.5);

        assert_eq!(body["model"], "m");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user text");
    }

    #[test]
    fn test_request_body_without_system_message() {
        let body = request_body("m", "user text", "", 512, 0.5);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_extract_content() {
        let payload = json!({"choices": [{"message": {"content": "hello"}}]});
        assert_eq!(extract_content(&payload).unwrap(), "hello");
    }

    #[test]
    fn test_extract_content_missing() {
        let err = extract_content(&json!({"choices": []})).unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::InvalidResponse);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_error(StatusCode::UNAUTHORIZED, "").kind, UpstreamErrorKind::Authentication);
        assert_eq!(status_error(StatusCode::FORBIDDEN, "").kind, UpstreamErrorKind::Authentication);
        assert_eq!(status_error(StatusCode::TOO_MANY_REQUESTS, "").kind, UpstreamErrorKind::RateLimited);
        assert_eq!(status_error(StatusCode::GATEWAY_TIMEOUT, "").kind, UpstreamErrorKind::Timeout);

        let other = status_error(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert_eq!(other.kind, UpstreamErrorKind::Other);
        assert_eq!(other.status, Some(500));
        assert!(other.message.contains("oops"));
    }
}
