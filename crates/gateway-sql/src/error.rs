//! Error types for the gateway SQL layer.

use thiserror::Error;

/// Main error type for gateway SQL operations.
///
/// Only structural failures surface here. Value-level problems (a column
/// that fails to parse, a `$contains` operand the dialect cannot express)
/// are logged and reported through the structured side lists on
/// [`Compiled`](crate::filter::Compiled) and
/// [`CoercionReport`](crate::coerce::CoercionReport).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Insert/update payload was not a field→value mapping.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Filter object had the wrong shape (e.g. `$or` is not an array).
    #[error("Invalid filter shape at '{path}': {message}")]
    InvalidFilterShape { path: String, message: String },

    /// Database type is unknown or has no SQL dialect.
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// Regex pattern keys did not line up with the rendered statement.
    #[error("Pattern key {index} ('{key}') does not match the rendered SQL")]
    PatternMismatch { index: usize, key: String },

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Create an InvalidFilterShape error for the given filter path.
    pub fn filter_shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::InvalidFilterShape {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        GatewayError::Config(message.into())
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for gateway SQL operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
