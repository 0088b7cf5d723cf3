//! Document text extraction: extension dispatch, transient files, and format extractors.

mod dispatcher;
mod extractors;
mod strategy;
pub mod types;

#[cfg(test)]
pub(crate) use extractors::fixtures;

pub use dispatcher::{DocumentExtractor, truncate_chars};
pub use strategy::{ExtractionStrategy, file_extension};
pub use types::{ExtractedDocument, ExtractionError, ExtractionOutcome, MAX_EXTRACTED_CHARS};
