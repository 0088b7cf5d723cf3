//! HTTP surface for the document summary backend.
//!
//! - `GET /` – Liveness message.
//! - `POST /upload/` – Multipart upload (field `file`). Returns `{ "text": ... }` with at most
//!   4000 characters, or `{ "error": "Unsupported file format" }` for unknown extensions.
//! - `POST /summarize/` – JSON `{ "text": ..., "length": "short" | "medium" | "long" }`. Returns
//!   `{ "summary": ... }`, or `{ "error": "No text provided" }` when `text` is missing or empty.
//!
//! Logical input errors keep a 200 status so clients branch on the payload alone. Extraction and
//! provider failures are reported as `{ "error": ... }` with a 4xx/5xx status.

use crate::extraction::ExtractionOutcome;
use crate::processing::{ProcessingApi, ProcessingError, SummaryOutcome};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

/// Message returned by the liveness route.
pub const ROOT_MESSAGE: &str = "Document Summary Assistant backend is running 🚀";
/// Payload error for uploads whose extension has no extractor.
pub const UNSUPPORTED_FORMAT: &str = "Unsupported file format";
/// Payload error for summarize requests without text.
pub const NO_TEXT_PROVIDED: &str = "No text provided";

const UPLOAD_FIELD: &str = "file";

/// Build the HTTP router exposing the upload and summarize API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: ProcessingApi + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/upload/", post(upload_document::<S>))
        .route("/summarize/", post(summarize_text::<S>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Any origin, method, and header. Credentials stay disabled: browsers reject a wildcard origin
/// combined with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

/// Response body for `POST /upload/`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum UploadResponse {
    Text { text: String },
    Error { error: &'static str },
}

/// Extract text from the uploaded `file` field.
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError>
where
    S: ProcessingApi,
{
    let mut multipart = multipart.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let upload_id = Uuid::new_v4();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        tracing::info!(
            upload_id = %upload_id,
            filename = %filename,
            bytes = bytes.len(),
            "Upload received"
        );

        let outcome = service.extract_upload(&filename, bytes.to_vec()).await?;
        let response = match outcome {
            ExtractionOutcome::Extracted(document) => UploadResponse::Text {
                text: document.text,
            },
            ExtractionOutcome::Unsupported => UploadResponse::Error {
                error: UNSUPPORTED_FORMAT,
            },
        };
        return Ok(Json(response));
    }

    Err(ApiError::BadRequest(format!(
        "multipart field `{UPLOAD_FIELD}` is required"
    )))
}

/// Request body for `POST /summarize/`.
#[derive(Debug, Deserialize)]
struct SummarizeRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    length: Option<String>,
}

/// Response body for `POST /summarize/`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SummarizeResponse {
    Summary { summary: String },
    Error { error: &'static str },
}

/// Summarize the provided text with the requested length template.
async fn summarize_text<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError>
where
    S: ProcessingApi,
{
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let response = match service.summarize(request.text, request.length).await? {
        SummaryOutcome::Summary(summary) => SummarizeResponse::Summary { summary },
        SummaryOutcome::NoText => SummarizeResponse::Error {
            error: NO_TEXT_PROVIDED,
        },
    };
    Ok(Json(response))
}

/// Failures rendered as `{ "error": ... }` with a non-2xx status.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Multipart(MultipartError),
    Processing(ProcessingError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(error) => error.status(),
            Self::Processing(ProcessingError::Extraction(error)) if error.is_content_error() => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Processing(ProcessingError::Extraction(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Processing(ProcessingError::Summarization(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::Multipart(error) => error.body_text(),
            Self::Processing(error) => error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}

impl From<MultipartError> for ApiError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart(inner)
    }
}
