#![deny(missing_docs)]

//! Core library for the Document Summary Assistant backend.

/// HTTP routing and handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Upload-to-text extraction strategies.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Request pipeline shared by the HTTP handlers.
pub mod processing;
/// Generative-model client abstraction and the Gemini adapter.
pub mod summarization;
