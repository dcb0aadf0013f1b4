//! Gemini `generateContent` client

use super::types::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use roundtable_application::ports::completion_client::{CompletionClient, ServiceError};
use roundtable_domain::{Model, Turn};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini REST base URL
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL up to the API version, e.g. `.../v1beta`
    pub api_base: String,
    pub api_key: String,
    /// Per-request timeout, covering connect and body read
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`CompletionClient`] backed by the Gemini REST API.
///
/// One `generate` call is one HTTP request: no retries, no caching.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        if config.api_key.trim().is_empty() {
            return Err(ServiceError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Configuration(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, model: &Model) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        )
    }

    fn parse_response(raw: &str) -> Result<String, ServiceError> {
        let parsed: GenerateContentResponse =
            serde_json::from_str(raw).map_err(|e| ServiceError::Malformed(e.to_string()))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!("Prompt blocked by service: {}", reason);
        }
        if let Some(reason) = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!("Finish reason: {}", reason);
        }

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ServiceError::EmptyResponse),
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(
        &self,
        model: &Model,
        contents: &[Turn],
        system_instruction: &str,
    ) -> Result<String, ServiceError> {
        let body = GenerateContentRequest::new(contents, system_instruction);

        debug!(model = %model, turns = contents.len(), "Sending generateContent request");

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(model = %model, status = status.as_u16(), "generateContent failed");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        Self::parse_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            GeminiConfig::new("test-gemini-key")
                .with_api_base(format!("{}/v1beta/", server.base_url()))
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_expected_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.5-flash:generateContent")
                    .header("x-goog-api-key", "test-gemini-key")
                    .json_body_includes(
                        json!({
                            "contents": [
                                {"role": "user", "parts": [{"text": "Hi"}]},
                                {"role": "model", "parts": [{"text": "Hello"}]},
                                {"role": "user", "parts": [{"text": "Define entropy."}]}
                            ],
                            "systemInstruction": {"parts": [{"text": "be precise"}]}
                        })
                        .to_string(),
                    );
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "A measure of disorder."}]},
                        "finishReason": "STOP"
                    }]
                }));
            })
            .await;

        let turns = vec![
            Turn::user("Hi"),
            Turn::agent("Hello"),
            Turn::user("Define entropy."),
        ];
        let text = client_for(&server)
            .generate(&Model::Gemini25Flash, &turns, "be precise")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "A measure of disorder.");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).body("quota exceeded");
            })
            .await;

        let err = client_for(&server)
            .generate(&Model::default(), &[Turn::user("q")], "sys")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Status {
                status: 429,
                body: "quota exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200)
                    .json_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
            })
            .await;

        let err = client_for(&server)
            .generate(&Model::default(), &[Turn::user("q")], "sys")
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_whitespace_text_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "  \n"}]}}]
                }));
            })
            .await;

        let err = client_for(&server)
            .generate(&Model::default(), &[Turn::user("q")], "sys")
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let err = client_for(&server)
            .generate(&Model::default(), &[Turn::user("q")], "sys")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = GeminiClient::new(
            GeminiConfig::new("key")
                .with_api_base("http://127.0.0.1:9/v1beta")
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let err = client
            .generate(&Model::default(), &[Turn::user("q")], "sys")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let err = GeminiClient::new(GeminiConfig::new("   ")).err().unwrap();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            GeminiConfig::new("key").with_api_base("https://example.test/v1beta/"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(&Model::Gemini25Pro),
            "https://example.test/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }
}
