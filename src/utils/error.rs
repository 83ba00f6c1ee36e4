//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use std::path::Path;

use memory_bank_core::CoreError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Errors raised by the validation pipeline or tool registry
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Display form with absolute paths replaced, see [`sanitize_message`].
    pub fn sanitized(&self, project_root: Option<&Path>) -> String {
        sanitize_message(&self.to_string(), project_root)
    }
}

/// Convert AppError to a string suitable for tool responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

/// Convert back into the core taxonomy for `ToolRegistry` execution
impl From<AppError> for CoreError {
    fn from(err: AppError) -> CoreError {
        match err {
            AppError::Core(e) => e,
            AppError::Config(msg) => CoreError::Config(msg),
            AppError::Io(e) => CoreError::Io(e),
            AppError::Serialization(e) => CoreError::Serialization(e),
            AppError::Validation(msg) => CoreError::Validation(msg),
            AppError::NotFound(msg) => CoreError::NotFound(msg),
            AppError::Internal(msg) => CoreError::Internal(msg),
        }
    }
}

/// Strip absolute system paths from a message before it leaves the process.
///
/// The project root becomes `<project>` and the home directory becomes `~`.
/// The project root is replaced first since it usually lives under home.
pub fn sanitize_message(message: &str, project_root: Option<&Path>) -> String {
    let mut sanitized = message.to_string();

    if let Some(root) = project_root {
        let root = root.to_string_lossy();
        if !root.is_empty() && root != "/" {
            sanitized = sanitized.replace(root.trim_end_matches('/'), "<project>");
        }
    }

    if let Some(home) = dirs::home_dir() {
        let home = home.to_string_lossy();
        if !home.is_empty() && home != "/" {
            sanitized = sanitized.replace(home.trim_end_matches('/'), "~");
        }
    }

    sanitized
}
