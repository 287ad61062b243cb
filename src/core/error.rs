//! Error types for the logger

use std::path::Path;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation} '{path}': {source}")]
    IoOperation {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Existing JSON log file does not end with the array's closing bracket
    #[error("Malformed log file '{path}': {message}")]
    MalformedLogFile { path: String, message: String },

    /// Blocking writer task was cancelled or panicked
    #[error("Log writer task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        path: impl AsRef<Path>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a malformed log file error
    pub fn malformed(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        LoggerError::MalformedLogFile {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }
}
