use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Port used when neither `PORT` nor `--port` is provided.
pub const DEFAULT_PORT: u16 = 8000;
/// Upper bound on multipart request bodies (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
/// Log file used when `DOCSUM_LOG_FILE` is not set, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "logs/docsum.log";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the document summary backend.
///
/// Built once at startup and handed to the services that need it; nothing reads the
/// environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the Gemini API (`GEMINI_API_KEY`).
    pub gemini_api_key: String,
    /// Model identifier passed to `generateContent`.
    pub gemini_model: String,
    /// Base URL of the Gemini REST API.
    pub gemini_base_url: String,
    /// Port the HTTP server listens on.
    pub server_port: u16,
    /// Maximum accepted request body size for uploads.
    pub max_upload_bytes: usize,
    /// Directory that holds transient upload files.
    pub upload_temp_dir: PathBuf,
    /// Settings for the OCR child process.
    pub ocr: OcrSettings,
    /// File that receives a copy of the log output (`DOCSUM_LOG_FILE`).
    pub log_file: PathBuf,
}

/// How the `tesseract` executable is invoked for image uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// Executable name or path.
    pub command: String,
    /// Language pack passed via `-l`.
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            command: "tesseract".into(),
            language: "eng".into(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = OcrSettings::default();

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY")
                .ok_or_else(|| ConfigError::MissingVariable("GEMINI_API_KEY".into()))?,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
            server_port: parse_optional(get("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT),
            max_upload_bytes: parse_optional(get("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            upload_temp_dir: get("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            ocr: OcrSettings {
                command: get("TESSERACT_CMD").unwrap_or(defaults.command),
                language: get("TESSERACT_LANG").unwrap_or(defaults.language),
            },
            log_file: get("DOCSUM_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

fn parse_optional<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Load `.env` (if present) and then the process environment.
///
/// Runs before tracing is installed, so values from `.env` (including `RUST_LOG`) are visible
/// to the subscriber.
pub fn load() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    Config::from_env()
}
