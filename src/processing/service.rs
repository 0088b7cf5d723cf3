//! Processing service coordinating extraction and summarization.

use crate::{
    config::Config,
    extraction::{DocumentExtractor, ExtractionOutcome},
    processing::types::{ProcessingError, SummaryOutcome},
    summarization::{
        GeminiClient, SummarizationClient, SummarizationClientError, SummaryLength, build_prompt,
    },
};
use async_trait::async_trait;

/// Owns the extractor and the model client shared by every request.
///
/// Construct once near process start and share it through an `Arc`; it holds no mutable state.
pub struct ProcessingService {
    extractor: DocumentExtractor,
    summarizer: Box<dyn SummarizationClient>,
}

/// Abstraction over the processing pipeline used by the HTTP surface.
#[async_trait]
pub trait ProcessingApi: Send + Sync {
    /// Extract bounded plain text from an uploaded file.
    async fn extract_upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionOutcome, ProcessingError>;

    /// Summarize `text` using the template selected by `length`.
    async fn summarize(
        &self,
        text: Option<String>,
        length: Option<String>,
    ) -> Result<SummaryOutcome, ProcessingError>;
}

impl ProcessingService {
    /// Assemble a service from its parts.
    pub fn new(extractor: DocumentExtractor, summarizer: Box<dyn SummarizationClient>) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    /// Build the production service: filesystem extractor plus Gemini client.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        tracing::info!(model = %config.gemini_model, "Initializing Gemini client");
        let summarizer = GeminiClient::from_config(config)?;
        Ok(Self::new(
            DocumentExtractor::from_config(config),
            Box::new(summarizer),
        ))
    }
}

#[async_trait]
impl ProcessingApi for ProcessingService {
    async fn extract_upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionOutcome, ProcessingError> {
        let outcome = self.extractor.extract(filename, bytes).await?;
        if let ExtractionOutcome::Extracted(document) = &outcome {
            tracing::info!(
                filename,
                strategy = %document.strategy,
                original_chars = document.original_chars,
                truncated = document.truncated(),
                "Extracted document text"
            );
        }
        Ok(outcome)
    }

    async fn summarize(
        &self,
        text: Option<String>,
        length: Option<String>,
    ) -> Result<SummaryOutcome, ProcessingError> {
        let Some(text) = text.filter(|text| !text.is_empty()) else {
            return Ok(SummaryOutcome::NoText);
        };
        let length = SummaryLength::from_hint(length.as_deref());
        let prompt = build_prompt(length, &text);

        tracing::debug!(
            length = %length,
            text_chars = text.chars().count(),
            "Requesting summary"
        );
        let summary = self.summarizer.generate_summary(&prompt).await?;
        tracing::info!(
            length = %length,
            summary_chars = summary.chars().count(),
            "Summary generated"
        );
        Ok(SummaryOutcome::Summary(summary))
    }
}
