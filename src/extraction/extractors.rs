//! Format-specific extractors. All functions here block.

use crate::config::OcrSettings;
use image::{ImageFormat, ImageReader};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use zip::ZipArchive;

use super::ExtractionError;

/// Archive member holding the body of a WordprocessingML document.
const WORD_BODY_PART: &str = "word/document.xml";

pub(crate) fn extract_pdf(path: &Path) -> Result<String, ExtractionError> {
    pdf_extract::extract_text(path).map_err(|error| ExtractionError::Pdf(error.to_string()))
}

/// Read the body text of an OOXML document. Text runs are concatenated and every paragraph
/// ends with a newline.
pub(crate) fn extract_word(path: &Path) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(File::open(path)?).map_err(word_error)?;
    let mut xml = String::new();
    archive
        .by_name(WORD_BODY_PART)
        .map_err(word_error)?
        .read_to_string(&mut xml)
        .map_err(word_error)?;
    body_text(&xml).map_err(word_error)
}

fn word_error(error: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Word(error.to_string())
}

fn body_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) if element.local_name().as_ref() == b"t" => {
                in_run_text = true;
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(element) => match element.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(run) if in_run_text => text.push_str(&run.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Read a UTF-8 text file, folding `\r\n` and lone `\r` line endings into `\n`.
pub(crate) fn extract_plain_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    Ok(normalize_newlines(text))
}

fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode the image, re-encode it as PNG next to the upload, and run tesseract on it.
///
/// The format is sniffed from the file contents, so a PNG uploaded as `.jpg` still decodes.
pub(crate) fn extract_image(
    path: &Path,
    scratch_dir: &Path,
    ocr: &OcrSettings,
) -> Result<String, ExtractionError> {
    let decoded = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|error| ExtractionError::ImageDecode(error.to_string()))?;

    let normalized = tempfile::Builder::new()
        .prefix("docsum-ocr-")
        .suffix(".png")
        .tempfile_in(scratch_dir)?;
    decoded
        .save_with_format(normalized.path(), ImageFormat::Png)
        .map_err(|error| ExtractionError::ImageDecode(error.to_string()))?;

    tracing::debug!(
        command = %ocr.command,
        language = %ocr.language,
        "Running OCR"
    );
    let output = Command::new(&ocr.command)
        .arg(normalized.path())
        .arg("stdout")
        .arg("-l")
        .arg(&ocr.language)
        .output()
        .map_err(|error| {
            ExtractionError::Ocr(format!("failed to run `{}`: {error}", ocr.command))
        })?;
    normalized.close()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::Ocr(format!(
            "`{}` exited with {}: {}",
            ocr.command,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
