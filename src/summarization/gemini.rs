use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{SummarizationClient, SummarizationClientError};

/// Gemini `generateContent` adapter.
///
/// Holds one pooled HTTP client for the lifetime of the process; requests use the client's
/// default timeouts.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client for `model` at `base_url`, authenticating with `api_key`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent(concat!("docsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build a client from runtime configuration.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String, SummarizationClientError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates returned".into());
            return Err(SummarizationClientError::InvalidResponse(reason));
        };

        let parts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if parts.is_empty() {
            return Err(SummarizationClientError::InvalidResponse(format!(
                "candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(parts.concat())
    }
}

#[async_trait]
impl SummarizationClient for GeminiClient {
    async fn generate_summary(&self, prompt: &str) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Gemini at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    tracing::debug!(%status, error = %error, "Failed to read Gemini error body");
                    String::new()
                }
            };
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Gemini response: {error}"
            ))
        })?;

        body.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(server.base_url(), "test-key", "gemini-test").expect("client")
    }

    #[tokio::test]
    async fn sends_prompt_as_single_part_and_joins_response_parts() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(ENDPOINT)
                    .header("x-goog-api-key", "test-key")
                    .json_body(json!({
                        "contents": [{ "parts": [{ "text": "Summarize this document briefly:\nHello" }] }]
                    }));
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "A greeting" }, { "text": "." }], "role": "model" },
                        "finishReason": "STOP"
                    }]
                }));
            })
            .await;

        let summary = client_for(&server)
            .generate_summary("Summarize this document briefly:\nHello")
            .await
            .expect("summary");

        mock.assert_async().await;
        assert_eq!(summary, "A greeting.");
    }

    #[tokio::test]
    async fn error_status_is_generation_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(ENDPOINT);
                then.status(429).body("quota exhausted");
            })
            .await;

        let error = client_for(&server)
            .generate_summary("prompt")
            .await
            .expect_err("rate limited");

        assert!(
            matches!(&error, SummarizationClientError::GenerationFailed(message) if message.contains("429") && message.contains("quota"))
        );
    }

    #[tokio::test]
    async fn blocked_prompt_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(ENDPOINT);
                then.status(200).json_body(json!({
                    "promptFeedback": { "blockReason": "SAFETY" }
                }));
            })
            .await;

        let error = client_for(&server)
            .generate_summary("prompt")
            .await
            .expect_err("blocked");

        assert!(
            matches!(&error, SummarizationClientError::InvalidResponse(message) if message == "SAFETY")
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_provider_unavailable() {
        let client = GeminiClient::new("http://127.0.0.1:1", "k", "gemini-test").expect("client");

        let error = client
            .generate_summary("prompt")
            .await
            .expect_err("unreachable");

        assert!(matches!(
            error,
            SummarizationClientError::ProviderUnavailable(_)
        ));
    }
}
