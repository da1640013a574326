//! Error types for tb
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown board/list/task, not logged in)
//! - 3: Auth rejection (missing, expired, or mismatched login code)
//! - 4: Operation failed (IO, lock contention, remote assistant failure)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tb CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_REJECTED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tb operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Data directory not initialized: {0}")]
    NotInitialized(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid deadline '{0}': expected YYYY-MM-DD")]
    InvalidDeadline(String),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Integration disabled: {0}")]
    IntegrationDisabled(String),

    // Auth rejections (exit code 3)
    #[error("No login code issued for {0}")]
    CodeNotFound(String),

    #[error("Login code does not match")]
    CodeMismatch,

    #[error("Login code expired for {0}")]
    CodeExpired(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::NotInitialized(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidDeadline(_)
            | Error::BoardNotFound(_)
            | Error::ListNotFound(_)
            | Error::TaskNotFound(_)
            | Error::UserNotFound(_)
            | Error::NotLoggedIn
            | Error::IntegrationDisabled(_) => exit_codes::USER_ERROR,

            // Auth rejections
            Error::CodeNotFound(_) | Error::CodeMismatch | Error::CodeExpired(_) => {
                exit_codes::AUTH_REJECTED
            }

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::Http(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the error carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotInitialized(path) | Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            Error::CodeExpired(email) | Error::CodeNotFound(email) => {
                Some(serde_json::json!({ "email": email }))
            }
            _ => None,
        }
    }
}

/// Result type alias for tb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
