//! Error types for geotool crates.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Primary error type for caching and grid operations.
#[derive(Debug, Error)]
pub enum GeoError {
    // === Validation Errors ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // === Data Errors ===
    #[error("Failed to read source data: {0}")]
    ReadFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Projection error: {0}")]
    Projection(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeoError {
    /// Create an InvalidInput error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a ReadFailure error.
    pub fn read_failure(msg: impl Into<String>) -> Self {
        Self::ReadFailure(msg.into())
    }

    /// True for errors raised by argument validation, before any I/O happened.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, GeoError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Serialization(format!("JSON error: {}", err))
    }
}
