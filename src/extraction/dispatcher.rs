//! Upload dispatcher: picks a strategy, stages the bytes in a transient file, and truncates output.

use crate::config::{Config, OcrSettings};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{
    ExtractedDocument, ExtractionError, ExtractionOutcome, ExtractionStrategy, MAX_EXTRACTED_CHARS,
    file_extension,
};

/// Turns uploaded files into bounded plain text.
///
/// Each call owns one transient file under `scratch_dir` for the duration of the extraction and
/// removes it before returning, whatever the outcome.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    scratch_dir: PathBuf,
    ocr: OcrSettings,
    max_chars: usize,
}

impl DocumentExtractor {
    /// Create an extractor staging files in `scratch_dir`.
    pub fn new(scratch_dir: impl Into<PathBuf>, ocr: OcrSettings) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            ocr,
            max_chars: MAX_EXTRACTED_CHARS,
        }
    }

    /// Build an extractor from runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.upload_temp_dir.clone(), config.ocr.clone())
    }

    /// Extract text from `bytes`, choosing the strategy from `filename`'s extension.
    pub async fn extract(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let Some((extension, strategy)) = file_extension(filename).and_then(|extension| {
            ExtractionStrategy::from_extension(&extension).map(|strategy| (extension, strategy))
        }) else {
            tracing::info!(filename, "Rejected upload with unsupported extension");
            return Ok(ExtractionOutcome::Unsupported);
        };

        tracing::debug!(
            filename,
            extension = %extension,
            strategy = %strategy,
            bytes = bytes.len(),
            "Dispatching upload to extractor"
        );

        let scratch_dir = self.scratch_dir.clone();
        let ocr = self.ocr.clone();
        let raw = tokio::task::spawn_blocking(move || {
            extract_staged(strategy, &extension, &bytes, &scratch_dir, &ocr)
        })
        .await
        .map_err(|error| ExtractionError::Worker(error.to_string()))??;

        let original_chars = raw.chars().count();
        let text = truncate_chars(raw, self.max_chars);
        Ok(ExtractionOutcome::Extracted(ExtractedDocument {
            strategy,
            text,
            original_chars,
        }))
    }
}

/// Write `bytes` to a transient file, run the extractor on it, and remove the file.
fn extract_staged(
    strategy: ExtractionStrategy,
    extension: &str,
    bytes: &[u8],
    scratch_dir: &Path,
    ocr: &OcrSettings,
) -> Result<String, ExtractionError> {
    let mut staged = tempfile::Builder::new()
        .prefix("docsum-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(scratch_dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;

    let extracted = strategy.extract(staged.path(), scratch_dir, ocr);
    let removed = staged.close();
    let text = extracted?;
    removed?;
    Ok(text)
}

/// Keep the first `max_chars` characters of `text`.
pub fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::super::extractors::fixtures::{docx_bytes, document_xml, write_pdf};
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scratch_entries(dir: &Path) -> usize {
        fs::read_dir(dir).expect("read dir").count()
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("ééééé".into(), 3), "ééé");
        assert_eq!(truncate_chars("short".into(), 4000), "short");
        assert_eq!(truncate_chars("exact".into(), 5), "exact");
        assert_eq!(truncate_chars("anything".into(), 0), "");
    }

    #[tokio::test]
    async fn txt_upload_returns_contents() {
        let dir = TempDir::new().expect("tempdir");
        let extractor = DocumentExtractor::new(dir.path(), OcrSettings::default());

        let outcome = extractor
            .extract("notes.txt", b"abc".to_vec())
            .await
            .expect("extract");

        match outcome {
            ExtractionOutcome::Extracted(document) => {
                assert_eq!(document.text, "abc");
                assert_eq!(document.strategy, ExtractionStrategy::PlainText);
                assert!(!document.truncated());
            }
            ExtractionOutcome::Unsupported => panic!("txt must be supported"),
        }
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn long_text_is_cut_to_the_first_4000_characters() {
        let dir = TempDir::new().expect("tempdir");
        let extractor = DocumentExtractor::new(dir.path(), OcrSettings::default());
        let full: String = (0..5000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();

        let outcome = extractor
            .extract("LONG.TXT", full.clone().into_bytes())
            .await
            .expect("extract");

        let ExtractionOutcome::Extracted(document) = outcome else {
            panic!("txt must be supported");
        };
        assert_eq!(document.text.chars().count(), MAX_EXTRACTED_CHARS);
        assert_eq!(document.text, full[..MAX_EXTRACTED_CHARS]);
        assert_eq!(document.original_chars, 5000);
        assert!(document.truncated());
    }

    #[tokio::test]
    async fn binary_documents_are_extracted_and_removed() {
        let dir = TempDir::new().expect("tempdir");
        let extractor = DocumentExtractor::new(dir.path(), OcrSettings::default());
        let source = TempDir::new().expect("source dir");
        let pdf_path = source.path().join("brief.pdf");
        write_pdf(&pdf_path, "Budget overview");
        let pdf = fs::read(&pdf_path).expect("read pdf");
        let docx = docx_bytes(&document_xml(&["Agenda", "Minutes"]));

        let ExtractionOutcome::Extracted(document) =
            extractor.extract("brief.PDF", pdf).await.expect("pdf")
        else {
            panic!("pdf must be supported");
        };
        assert_eq!(document.strategy, ExtractionStrategy::Pdf);
        assert!(document.text.contains("Budget"), "got {:?}", document.text);

        let ExtractionOutcome::Extracted(document) =
            extractor.extract("minutes.docx", docx).await.expect("docx")
        else {
            panic!("docx must be supported");
        };
        assert_eq!(document.strategy, ExtractionStrategy::Word);
        assert_eq!(document.text, "Agenda\nMinutes\n");

        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn image_upload_returns_ocr_output() {
        let dir = TempDir::new().expect("tempdir");
        let ocr = OcrSettings {
            command: "echo".into(),
            language: "eng".into(),
        };
        let extractor = DocumentExtractor::new(dir.path(), ocr);
        let mut png = std::io::Cursor::new(Vec::new());
        image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]))
            .write_to(&mut png, image::ImageFormat::Png)
            .expect("encode png");

        let ExtractionOutcome::Extracted(document) = extractor
            .extract("receipt.png", png.into_inner())
            .await
            .expect("image")
        else {
            panic!("png must be supported");
        };
        assert_eq!(document.strategy, ExtractionStrategy::Image);
        assert!(document.text.trim_end().ends_with("stdout -l eng"));
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn unsupported_extensions_touch_nothing() {
        let dir = TempDir::new().expect("tempdir");
        let extractor = DocumentExtractor::new(dir.path(), OcrSettings::default());

        for name in ["setup.exe", "table.csv", "no_extension"] {
            let outcome = extractor
                .extract(name, b"payload".to_vec())
                .await
                .expect("extract");
            assert_eq!(outcome, ExtractionOutcome::Unsupported);
        }
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn failed_extraction_still_removes_transient_file() {
        let dir = TempDir::new().expect("tempdir");
        let extractor = DocumentExtractor::new(dir.path(), OcrSettings::default());

        let error = extractor
            .extract("bad.txt", vec![0xff, 0xfe, 0xfd])
            .await
            .expect_err("invalid utf-8");
        assert!(matches!(error, ExtractionError::InvalidUtf8(_)));
        assert!(error.is_content_error());

        let error = extractor
            .extract("bad.pdf", b"not a pdf".to_vec())
            .await
            .expect_err("corrupt pdf");
        assert!(error.is_content_error());

        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn missing_scratch_dir_is_an_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let extractor =
            DocumentExtractor::new(dir.path().join("does-not-exist"), OcrSettings::default());

        let error = extractor
            .extract("a.txt", b"abc".to_vec())
            .await
            .expect_err("no scratch dir");
        assert!(matches!(error, ExtractionError::Io(_)));
        assert!(!error.is_content_error());
    }
}
