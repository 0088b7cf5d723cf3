//! Core data types and error definitions for the request pipeline.

use crate::{extraction::ExtractionError, summarization::SummarizationClientError};
use thiserror::Error;

/// Errors emitted by the processing service.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Text extraction failed for an upload with a supported extension.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    /// The model provider failed to produce a summary.
    #[error("{0}")]
    Summarization(#[from] SummarizationClientError),
}

/// Outcome of a summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Model response text.
    Summary(String),
    /// The request carried no text; the model was not called.
    NoText,
}
