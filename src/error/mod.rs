//! Error handling for the diversity indicators.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod util;

/// Errors raised while loading tables or computing indicators
#[derive(Debug, thiserror::Error)]
pub enum IndicatorError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from an Arrow compute kernel or record batch construction
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting records to or from Arrow
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_arrow::Error),

    /// Error reading a JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input table lacks columns an operation needs
    #[error("Schema error: missing column(s) {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// An operation was called with arguments that cannot be satisfied
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A ratio or index has a zero denominator
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IndicatorError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an arithmetic error
    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic(message.into())
    }
}

/// Result type for indicator operations
pub type Result<T> = std::result::Result<T, IndicatorError>;
