// src/error.rs
use thiserror::Error;

/// Errors surfaced by the analyzer. Per-row parse issues are *not* errors:
/// they are recovered locally and reported through
/// [`crate::attendance::ParseStats`].
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid attendance rows remain after parsing and calendar filtering")]
    NoValidData,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}
