//! Error types for zhihu-dl
//!
//! Two layers of errors exist:
//! - [`Error`] - batch-level failures. These abort a batch and propagate to the caller
//!   (the CLI or the HTTP layer) unmodified.
//! - [`ProviderError`] - item-level failures raised by a [`RetrievalProvider`]. These
//!   never escape a batch; dispatch turns them into a failure outcome and a log line.
//!
//! [`RetrievalProvider`]: crate::provider::RetrievalProvider

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for zhihu-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for zhihu-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "output_dir")
        key: Option<String>,
    },

    /// The batch output directory could not be created or is not a directory
    #[error("cannot prepare output directory {}: {source}", path.display())]
    OutputDirectory {
        /// Directory that was being prepared
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The failure log could not be opened or appended to
    #[error("cannot write failure log {}: {source}", path.display())]
    FailureLog {
        /// Path of the failure log
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error (HTTP client construction and similar)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Item-level failure raised while retrieving a single locator
///
/// Every variant is recoverable from the batch's point of view. The `Display`
/// text is what ends up in the failure log.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The locator is not a parseable URL
    #[error("invalid URL '{locator}': {reason}")]
    InvalidUrl {
        /// The offending locator
        locator: String,
        /// Why parsing failed
        reason: String,
    },

    /// The URL parses but does not point at a supported content type
    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote item does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The credential does not grant access to the item
    #[error("permission denied (HTTP {status}) for {url}")]
    PermissionDenied {
        /// HTTP status returned by the site (401 or 403)
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Any other non-success HTTP status
    #[error("HTTP {status} for {url}")]
    Http {
        /// HTTP status returned by the site
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The payload could not be interpreted
    #[error("parse error: {0}")]
    Parse(String),

    /// Saving the payload failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The retrieval exceeded the configured per-item timeout
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "output_directory_error",
///     "message": "cannot prepare output directory downloads: permission denied",
///     "details": {
///       "path": "downloads"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "config_error", "failure_log_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 400,

            // Batch-level storage failures are server-side
            Error::OutputDirectory { .. } => 500,
            Error::FailureLog { .. } => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            Error::Network(_) => 502,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::OutputDirectory { .. } => "output_directory_error",
            Error::FailureLog { .. } => "failure_log_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::OutputDirectory { path, .. } | Error::FailureLog { path, .. } => {
                Some(serde_json::json!({
                    "path": path,
                }))
            }
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
