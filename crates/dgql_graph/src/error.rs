//! Error types for graph backend operations.

use crate::uid::Uid;
use thiserror::Error;

/// Result type for graph backend operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors reported by a graph backend.
///
/// The store above does not interpret these beyond "succeeded / failed";
/// the variants exist so that tests and logs can tell causes apart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The connection to the graph is not established.
    #[error("connection is not established")]
    NotConnected,

    /// The query text could not be parsed.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the query text.
        offset: usize,
        /// What the parser expected or found.
        message: String,
    },

    /// A query variable was used without being declared or supplied.
    #[error("variable ${name} is not defined")]
    UnknownVariable {
        /// Variable name without the `$` sigil.
        name: String,
    },

    /// The mutation payload does not have the expected shape.
    #[error("malformed mutation: {0}")]
    MalformedMutation(String),

    /// A uid literal could not be parsed.
    #[error("invalid uid: {0:?}")]
    InvalidUid(String),

    /// A mutation referenced a node that does not exist.
    #[error("unknown uid {0}")]
    UnknownUid(Uid),

    /// A write would give two nodes the same value for a unique predicate.
    #[error("unique constraint violated: {predicate} = {value}")]
    UniqueViolation {
        /// The unique predicate.
        predicate: String,
        /// The duplicated value.
        value: String,
    },

    /// The transaction has already been committed or discarded.
    #[error("transaction has already been {0}")]
    Finished(&'static str),

    /// A failure produced by the fault injector.
    #[error("injected {0} failure")]
    Injected(&'static str),

    /// A query result could not be encoded.
    #[error("encode result: {0}")]
    Encode(String),
}

impl GraphError {
    /// Creates a syntax error.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Creates a malformed mutation error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMutation(message.into())
    }
}
