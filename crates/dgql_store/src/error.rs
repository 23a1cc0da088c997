//! Error types for store operations.

use dgql_graph::GraphError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The graph connection is not established; no scope was opened.
    #[error("connection is not active")]
    ConnectionInactive,

    /// A read query failed.
    #[error("query: {0}")]
    Query(#[source] GraphError),

    /// A query result could not be mapped to the expected shape.
    #[error("decode {target}: {source}")]
    Decode {
        /// Name of the expected type.
        target: &'static str,
        /// The decoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// A mutation was rejected.
    #[error("mutation: {0}")]
    Mutation(#[source] GraphError),

    /// Commit failed; all staged writes are lost.
    #[error("commit: {0}")]
    Commit(#[source] GraphError),

    /// Discarding after an earlier error failed; the final transaction
    /// state is unknown.
    #[error("rollback failed after: {original}: {source}")]
    Rollback {
        /// The discard failure.
        #[source]
        source: GraphError,
        /// The error that caused the rollback.
        original: Box<StoreError>,
    },

    /// The request context was canceled or its deadline passed.
    #[error("operation canceled")]
    Canceled,

    /// A referenced entity does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"user"`.
        kind: &'static str,
        /// The domain ID or uid that was looked up.
        id: String,
    },

    /// The store was used incorrectly.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Returns true if the caller's request caused the error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns true if the error comes from the store or the graph.
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the error that started a failed scope.
    ///
    /// For [`StoreError::Rollback`] this is the original error, otherwise
    /// the error itself.
    pub fn root(&self) -> &StoreError {
        match self {
            StoreError::Rollback { original, .. } => original.root(),
            other => other,
        }
    }
}
