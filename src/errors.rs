use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialectError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported type parameter: {0}")]
    UnsupportedType(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Library {library} unavailable after {timeout:?}")]
    LibraryUnavailable { library: String, timeout: Duration },

    #[error("Cannot coerce {actual} into {expected}")]
    CoercionMismatch { expected: String, actual: String },

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Chrome error: {0}")]
    ChromeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Anyhow error: {0}")]
    AnyhowError(String),
}

pub type Result<T> = std::result::Result<T, DialectError>;

// Convert anyhow::Error to DialectError
impl From<anyhow::Error> for DialectError {
    fn from(err: anyhow::Error) -> Self {
        DialectError::AnyhowError(err.to_string())
    }
}

impl DialectError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        DialectError::InvalidArgument(message.into())
    }

    pub fn from_any_error<E: std::fmt::Display>(err: E) -> Self {
        DialectError::ChromeError(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DialectError::ElementNotFound(_))
    }
}

/// Rejects empty or whitespace-only required inputs before any script runs.
pub(crate) fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DialectError::invalid_argument(format!("{} must not be empty", what)));
    }
    Ok(())
}
