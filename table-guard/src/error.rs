//! Error types for the table-guard validation library.
//!
//! Only run-aborting conditions are errors: malformed rule configuration,
//! invalid regex patterns, unsupported dataset formats and unreadable files.
//! Rule violations found in the data are never errors; they are collected
//! into the [`Report`](crate::core::Report).

use thiserror::Error;

/// The main error type for the table-guard library.
#[derive(Error, Debug)]
pub enum GuardError {
    /// The rule configuration document or a rule in it is malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A rule's regex pattern failed to compile.
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as written in the rule
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The dataset file extension is not one of the supported formats.
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV", "Parquet", "JSON")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from JSON serialization or parsing.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, GuardError>`.
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            GuardError::Configuration(inner) => {
                GuardError::Configuration(format!("{}: {inner}", f()))
            }
            GuardError::Internal(inner) => GuardError::Internal(format!("{}: {inner}", f())),
            other => GuardError::Internal(format!("{}: {other}", f())),
        })
    }
}
