//! Request pipeline: upload extraction and prompt-driven summarization.

mod service;
pub mod types;

pub use service::{ProcessingApi, ProcessingService};
pub use types::{ProcessingError, SummaryOutcome};
