//! Extension-to-strategy lookup.

use crate::config::OcrSettings;
use std::fmt;
use std::path::Path;

use super::{ExtractionError, extractors};

/// Extraction algorithm selected for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStrategy {
    /// Layout-aware PDF text extraction.
    Pdf,
    /// Word document text extraction.
    Word,
    /// Strict UTF-8 read.
    PlainText,
    /// Image decode followed by OCR.
    Image,
}

const STRATEGY_TABLE: &[(&str, ExtractionStrategy)] = &[
    ("pdf", ExtractionStrategy::Pdf),
    ("doc", ExtractionStrategy::Word),
    ("docx", ExtractionStrategy::Word),
    ("txt", ExtractionStrategy::PlainText),
    ("png", ExtractionStrategy::Image),
    ("jpg", ExtractionStrategy::Image),
    ("jpeg", ExtractionStrategy::Image),
];

impl ExtractionStrategy {
    /// Look up the strategy for a normalized (lowercase) extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        STRATEGY_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == extension)
            .map(|(_, strategy)| *strategy)
    }

    /// Stable name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::PlainText => "plain_text",
            Self::Image => "image_ocr",
        }
    }

    /// Run the extractor for this strategy against a file on disk.
    ///
    /// Blocking; callers on the async runtime must go through `spawn_blocking`.
    pub(crate) fn extract(
        self,
        path: &Path,
        scratch_dir: &Path,
        ocr: &OcrSettings,
    ) -> Result<String, ExtractionError> {
        match self {
            Self::Pdf => extractors::extract_pdf(path),
            Self::Word => extractors::extract_word(path),
            Self::PlainText => extractors::extract_plain_text(path),
            Self::Image => extractors::extract_image(path, scratch_dir, ocr),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased text after the final `.` of `filename`.
///
/// Returns `None` when the name has no `.` or ends with one.
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .filter(|extension| !extension.is_empty())
        .map(str::to_lowercase)
}
