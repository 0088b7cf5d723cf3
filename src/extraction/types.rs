//! Result and error types for the extraction pipeline.

use super::ExtractionStrategy;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Hard cap on the number of characters returned from any extractor.
pub const MAX_EXTRACTED_CHARS: usize = 4000;

/// Errors raised while turning an upload into plain text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Writing, reading, or removing the transient file failed.
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
    /// The PDF could not be parsed.
    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),
    /// The Word document could not be opened or read.
    #[error("Failed to extract Word document text: {0}")]
    Word(String),
    /// A plain-text upload was not valid UTF-8.
    #[error("Text file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    /// The image could not be decoded or re-encoded for OCR.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),
    /// The OCR engine could not be started or exited with an error.
    #[error("OCR failed: {0}")]
    Ocr(String),
    /// The blocking extraction worker panicked or was cancelled.
    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

impl ExtractionError {
    /// Whether the failure was caused by the uploaded content rather than the server.
    pub fn is_content_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Worker(_))
    }
}

/// Text produced by a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Strategy that produced the text.
    pub strategy: ExtractionStrategy,
    /// Extracted text, at most [`MAX_EXTRACTED_CHARS`] characters.
    pub text: String,
    /// Character count before truncation.
    pub original_chars: usize,
}

impl ExtractedDocument {
    /// Whether the extractor produced more text than was returned.
    pub fn truncated(&self) -> bool {
        self.original_chars > self.text.chars().count()
    }
}

/// Outcome of dispatching an upload to an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// A strategy matched and produced text.
    Extracted(ExtractedDocument),
    /// The filename extension is not in the strategy table.
    Unsupported,
}
