//! Error handling types for ghost-edit
//!
//! Only the prediction side of the crate can fail. Diffing, classification
//! and application always resolve to a value (possibly `DiffOperation::None`).

use std::sync::PoisonError;
use thiserror::Error;

/// Errors produced while obtaining a prediction from a backend
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The request was superseded or explicitly cancelled.
    ///
    /// This is an expected outcome, not a failure: callers drop it silently.
    #[error("Prediction request cancelled")]
    Cancelled,

    /// Transport-level failure (connection refused, TLS, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered 2xx but the payload violates the API contract
    #[error("Malformed prediction response: {message}")]
    MalformedResponse { message: String },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for prediction operations
pub type PredictionResult<T> = Result<T, PredictionError>;

impl PredictionError {
    /// Create a non-2xx status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        PredictionError::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        PredictionError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        PredictionError::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PredictionError::Internal(message.into())
    }

    /// Whether this error represents a cancelled request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PredictionError::Cancelled)
    }
}

/// Helper trait to recover the guard from a poisoned lock
pub trait LockResultExt<T> {
    /// Recover from a PoisonError, logging which operation triggered it.
    fn recover_poison(self, context: &str) -> T;
}

impl<T> LockResultExt<T> for Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> T {
        match self {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!(
                    target: "ghost_edit::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                poisoned.into_inner()
            }
        }
    }
}
