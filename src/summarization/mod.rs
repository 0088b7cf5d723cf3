//! Abstractions for generating summaries through a hosted generative model.
//!
//! The processing layer builds a prompt from [`SummaryLength`] and hands it to a
//! [`SummarizationClient`]. The Gemini adapter issues a single `generateContent` request per
//! call; there is no retry or streaming.

mod gemini;
mod prompt;

pub use gemini::GeminiClient;
pub use prompt::{SummaryLength, build_prompt};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced while requesting a summary from the model provider.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be reached.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Send `prompt` to the model and return its text response.
    async fn generate_summary(&self, prompt: &str) -> Result<String, SummarizationClientError>;
}
