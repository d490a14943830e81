//! Error types for the Tax Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating tax, loading
//! settings, or updating deduction configuration.

use thiserror::Error;

/// The main error type for the Tax Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to map failures onto API responses in one place.
///
/// # Example
///
/// ```
/// use tax_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A field of an income statement was out of range.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An administrative deduction update was outside the allowed range.
    #[error("{message}")]
    DeductionOutOfRange {
        /// The deduction being updated (e.g., "personal").
        field: String,
        /// The human readable reason for the rejection.
        message: String,
    },

    /// A batch upload row could not be decoded.
    #[error("Invalid batch row {row}: {message}")]
    BatchParse {
        /// 1-based data row number (the header row is not counted).
        row: usize,
        /// A description of the decoding failure.
        message: String,
    },

    /// The deduction repository could not be read or written.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<sqlx::Error> for EngineError {
    fn from(error: sqlx::Error) -> Self {
        EngineError::Storage {
            message: error.to_string(),
        }
    }
}
