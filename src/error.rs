//! Error types for Motion Insight
//!
//! The analysis core is total and never fails. These errors belong to the
//! surfaces around it: request parsing, validation, configuration and encoding.

use thiserror::Error;

/// Errors raised before or after the analysis core runs
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid sampling rate: {0} Hz (must be at least 1)")]
    InvalidSamplingRate(i64),

    #[error("Invalid sample at index {index}: {reason}")]
    InvalidSample { index: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
