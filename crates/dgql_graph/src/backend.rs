//! Graph backend trait definitions.

use crate::error::GraphResult;
use crate::mutation::Mutation;
use crate::uid::Uid;
use std::collections::HashMap;

/// Named query variables, keyed with their `$` sigil (`"$id"`).
pub type Vars = HashMap<String, String>;

/// Uids assigned by a mutation, keyed by blank-node name (without `_:`).
pub type Assigned = HashMap<String, Uid>;

/// A connection to a transactional graph database.
///
/// # Invariants
///
/// - `new_txn` never blocks on other transactions
/// - Each returned transaction is independent; writes staged in one are
///   invisible to the others until it commits
/// - Implementations must be `Send + Sync` so that request workers can
///   share one connection
///
/// # Implementors
///
/// - [`super::MemoryGraph`] - in-process graph
pub trait GraphBackend: Send + Sync {
    /// Returns whether the connection is established.
    fn is_connected(&self) -> bool;

    /// Starts a new transaction.
    fn new_txn(&self) -> Box<dyn GraphTxn>;
}

/// A single transaction against a [`GraphBackend`].
///
/// Exactly one of `commit` or `discard` ends the transaction. Calling
/// `discard` on a finished transaction is a no-op; calling `commit` on one
/// is an error.
pub trait GraphTxn: Send {
    /// Runs a read query and returns the JSON result.
    ///
    /// # Errors
    ///
    /// Returns an error if the query text is invalid, the connection is
    /// down, or the transaction is finished.
    fn query(&mut self, query: &str) -> GraphResult<Vec<u8>>;

    /// Runs a read query with named variables and returns the JSON result.
    ///
    /// # Errors
    ///
    /// Same as [`GraphTxn::query`], plus undeclared or missing variables.
    fn query_with_vars(&mut self, query: &str, vars: &Vars) -> GraphResult<Vec<u8>>;

    /// Stages a mutation and returns the uids assigned to its blank nodes.
    ///
    /// A rejected mutation leaves the transaction's staged state untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed, references unknown
    /// nodes, or violates a unique predicate.
    fn mutate(&mut self, mutation: &Mutation) -> GraphResult<Assigned>;

    /// Atomically applies all staged writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the writes could not be applied. The staged
    /// writes are lost in that case.
    fn commit(&mut self) -> GraphResult<()>;

    /// Drops all staged writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not confirm the discard.
    fn discard(&mut self) -> GraphResult<()>;
}
