//! Error types for resolvers.

use crate::auth::AuthError;
use dgql_store::StoreError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for resolver operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can end a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller may not perform the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// A field of the input is invalid.
    #[error("invalid input: {field}: {reason}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse error classification for clients.
///
/// `Unauthorized`, `InvalidInput` and `NotFound` mean the request itself
/// was wrong; `Unavailable` means it may succeed if retried later;
/// `Internal` means the server is in trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Access denied.
    Unauthorized,
    /// Malformed input.
    InvalidInput,
    /// A referenced entity does not exist.
    NotFound,
    /// The graph is unreachable, the commit failed or the request timed out.
    Unavailable,
    /// Any other failure.
    Internal,
}

impl ErrorKind {
    /// Returns true if the request itself was wrong.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::Unauthorized | ErrorKind::InvalidInput | ErrorKind::NotFound
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::NotFound => "not found",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Transport-facing form of an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseError {
    /// Classification.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Creates an invalid input error.
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ApiError::Store(err) => match err {
                StoreError::NotFound { .. } => ErrorKind::NotFound,
                StoreError::ConnectionInactive | StoreError::Commit(_) | StoreError::Canceled => {
                    ErrorKind::Unavailable
                }
                StoreError::Query(_)
                | StoreError::Decode { .. }
                | StoreError::Mutation(_)
                | StoreError::Rollback { .. }
                | StoreError::InvalidOperation(_) => ErrorKind::Internal,
            },
        }
    }

    /// Returns the transport-facing form.
    pub fn to_response(&self) -> ResponseError {
        ResponseError {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}
