//! Transaction handle.

use crate::context::Context;
use crate::error::{StoreError, StoreResult};
use dgql_graph::{Assigned, GraphResult, GraphTxn, Mutation, Vars};
use serde::de::DeserializeOwned;

/// The live handle through which a scope issues queries and mutations.
///
/// A handle is bound to one graph transaction for its whole lifetime and
/// is only reachable through its [`crate::Scope`]. Every call checks the
/// scope's [`Context`] first. There is no retry logic; a caller that wants
/// to retry must open a new scope.
pub struct Txn {
    inner: Box<dyn GraphTxn>,
    ctx: Context,
}

impl Txn {
    pub(crate) fn new(inner: Box<dyn GraphTxn>, ctx: Context) -> Self {
        Self { inner, ctx }
    }

    /// Returns the context bound to this handle.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Runs a read query and decodes the result into `T`.
    ///
    /// The query sees committed data plus this transaction's staged writes.
    ///
    /// # Errors
    ///
    /// [`StoreError::Canceled`], [`StoreError::Query`] or
    /// [`StoreError::Decode`].
    pub fn query<T: DeserializeOwned>(&mut self, query: &str) -> StoreResult<T> {
        self.ctx.check()?;
        let raw = self.inner.query(query).map_err(StoreError::Query)?;
        decode(&raw)
    }

    /// Runs a read query with named variables and decodes the result.
    ///
    /// Variables are keyed with their `$` sigil and resolved by the graph;
    /// their values are never spliced into the query text.
    ///
    /// # Errors
    ///
    /// Same as [`Txn::query`].
    pub fn query_with_vars<T: DeserializeOwned>(
        &mut self,
        query: &str,
        vars: &Vars,
    ) -> StoreResult<T> {
        self.ctx.check()?;
        let raw = self
            .inner
            .query_with_vars(query, vars)
            .map_err(StoreError::Query)?;
        decode(&raw)
    }

    /// Stages one mutation and returns the uids assigned to its blank nodes.
    ///
    /// # Errors
    ///
    /// [`StoreError::Canceled`] or [`StoreError::Mutation`].
    pub fn mutate(&mut self, mutation: &Mutation) -> StoreResult<Assigned> {
        self.ctx.check()?;
        self.inner.mutate(mutation).map_err(StoreError::Mutation)
    }

    // Finalization ignores the context: a rollback must always be attempted.

    pub(crate) fn commit(&mut self) -> GraphResult<()> {
        self.inner.commit()
    }

    pub(crate) fn discard(&mut self) -> GraphResult<()> {
        self.inner.discard()
    }
}

impl std::fmt::Debug for Txn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Txn").field("ctx", &self.ctx).finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(raw: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(raw).map_err(|source| StoreError::Decode {
        target: std::any::type_name::<T>(),
        source,
    })
}

/// Builds a variable map from `("$name", value)` pairs.
pub fn vars<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vars {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dgql_graph::{FaultPoint, MemoryGraph};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Rows {
        node: Vec<Row>,
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(rename = "User.id")]
        id: String,
    }

    fn txn(graph: &MemoryGraph, ctx: Context) -> Txn {
        Txn::new(Box::new(graph.begin()), ctx)
    }

    #[test]
    fn query_decodes_staged_writes() {
        let graph = MemoryGraph::new();
        let mut txn = txn(&graph, Context::new());
        txn.mutate(&Mutation::set(json!({"uid": "_:u", "User.id": "u1"})))
            .unwrap();

        let rows: Rows = txn
            .query_with_vars(
                "query q($id: string) { node(func: eq(User.id, $id)) { User.id } }",
                &vars([("$id", "u1")]),
            )
            .unwrap();
        assert_eq!(rows.node.len(), 1);
        assert_eq!(rows.node[0].id, "u1");
        txn.discard().unwrap();
    }

    #[test]
    fn decode_error_names_target() {
        let graph = MemoryGraph::new();
        let mut txn = txn(&graph, Context::new());
        txn.mutate(&Mutation::set(json!({"uid": "_:u", "User.id": 7})))
            .unwrap();

        let err = txn
            .query::<Rows>("{ node(func: has(User.id)) { User.id } }")
            .unwrap_err();
        match err {
            StoreError::Decode { target, .. } => assert!(target.ends_with("Rows")),
            other => panic!("unexpected error: {other}"),
        }
        txn.discard().unwrap();
    }

    #[test]
    fn backend_failures_are_wrapped_by_step() {
        let graph = MemoryGraph::new();
        let mut txn = txn(&graph, Context::new());

        graph.faults().fail_next(FaultPoint::Query);
        assert!(matches!(
            txn.query::<serde_json::Value>("{ node(func: has(x)) { uid } }"),
            Err(StoreError::Query(_))
        ));

        graph.faults().fail_next(FaultPoint::Mutation);
        assert!(matches!(
            txn.mutate(&Mutation::set(json!({"x": 1}))),
            Err(StoreError::Mutation(_))
        ));
        txn.discard().unwrap();
    }

    #[test]
    fn canceled_context_blocks_calls_but_not_discard() {
        let graph = MemoryGraph::new();
        let ctx = Context::new();
        let mut txn = txn(&graph, ctx.clone());
        ctx.cancel();

        assert!(matches!(
            txn.mutate(&Mutation::set(json!({"x": 1}))),
            Err(StoreError::Canceled)
        ));
        assert!(txn.discard().is_ok());
        assert_eq!(graph.stats().discards, 1);
    }
}
