//! The entity store.

mod post;
mod reaction;
mod user;

use crate::config::StoreConfig;
use crate::context::Context;
use crate::entity::{Post, Reaction, Subject, User};
use crate::error::{StoreError, StoreResult};
use crate::schema;
use crate::transaction::{vars, Scope, Txn};
use dgql_graph::{Assigned, GraphBackend, Uid};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Domain-level API over a graph connection.
///
/// The store is cheap to clone and safe to share between request workers;
/// every operation opens its own [`Scope`]. Scopes can be opened
/// concurrently without external locking.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use dgql_graph::MemoryGraph;
/// use dgql_store::{Context, Store};
///
/// let store = Store::new(MemoryGraph::builder().unique("User.email").build());
/// let ctx = Context::new();
///
/// let user = store
///     .create_user(&ctx, Utc::now(), "ada@example.com", "Ada")
///     .unwrap();
/// let found = store.user(&ctx, &user.id).unwrap();
/// assert_eq!(found, Some(user));
/// ```
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn GraphBackend>,
    config: StoreConfig,
    scopes: Arc<AtomicU64>,
}

impl Store {
    /// Creates a store with the default configuration.
    pub fn new(backend: impl GraphBackend + 'static) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Creates a store with the given configuration.
    pub fn with_config(backend: impl GraphBackend + 'static, config: StoreConfig) -> Self {
        Self::from_shared(Arc::new(backend), config)
    }

    /// Creates a store over an already shared backend.
    pub fn from_shared(backend: Arc<dyn GraphBackend>, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            scopes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns whether the graph connection is established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    /// Opens a transaction scope.
    ///
    /// The returned scope must be ended with [`Scope::finalize`] or
    /// [`Scope::abort`]; dropping it rolls back.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConnectionInactive`] if the connection is down, or
    /// [`StoreError::Canceled`] if `ctx` is already canceled. No
    /// transaction is started in either case.
    pub fn open_scope(&self, ctx: &Context) -> StoreResult<Scope> {
        if !self.backend.is_connected() {
            tracing::warn!("cannot open scope: connection is not active");
            return Err(StoreError::ConnectionInactive);
        }
        ctx.check()?;

        let ctx = match self.config.scope_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.clone(),
        };
        let id = self.scopes.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(scope = id, "scope opened");
        Ok(Scope::new(id, Txn::new(self.backend.new_txn(), ctx)))
    }

    /// Runs `op` inside one scope: open, run, then finalize.
    ///
    /// The value returned by `op` is handed back only if the scope
    /// committed.
    ///
    /// # Errors
    ///
    /// Any error of [`Store::open_scope`], the error returned by `op`
    /// (possibly wrapped in [`StoreError::Rollback`]), or
    /// [`StoreError::Commit`].
    pub fn transact<T, F>(&self, ctx: &Context, op: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Txn) -> StoreResult<T>,
    {
        let mut scope = self.open_scope(ctx)?;
        match op(scope.txn()) {
            Ok(value) => scope.finalize().map(|()| value),
            Err(err) => Err(scope.abort(err)),
        }
    }

    /// Looks up any user, post or reaction by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope or the query fails.
    pub fn subject_by_uid(&self, ctx: &Context, uid: Uid) -> StoreResult<Option<Subject>> {
        self.transact(ctx, |txn| {
            Ok(match load_node(txn, uid)? {
                Some(Node::Post(post)) => Some(Subject::Post(post)),
                Some(Node::Reaction(reaction)) => Some(Subject::Reaction(reaction)),
                Some(Node::User(_)) | None => None,
            })
        })
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Query result with a single block named `node`.
#[derive(Debug, Deserialize)]
pub(crate) struct Rows<T> {
    #[serde(default = "Vec::new")]
    pub node: Vec<T>,
}

impl<T> Rows<T> {
    pub(crate) fn first(self) -> Option<T> {
        self.node.into_iter().next()
    }
}

/// A node decoded according to its type predicate.
pub(crate) enum Node {
    User(User),
    Post(Post),
    Reaction(Reaction),
}

pub(crate) fn load_node(txn: &mut Txn, uid: Uid) -> StoreResult<Option<Node>> {
    let query = format!(
        "query node($uid: string) {{ node(func: uid($uid)) {{ {} {} {} {} }} }}",
        schema::TYPE,
        schema::USER_FIELDS,
        schema::POST_FIELDS,
        schema::REACTION_FIELDS,
    );
    let uid_text = uid.to_string();
    let rows: Rows<Value> = txn.query_with_vars(&query, &vars([("$uid", uid_text.as_str())]))?;
    let Some(row) = rows.first() else {
        return Ok(None);
    };

    Ok(match row.get(schema::TYPE).and_then(Value::as_str) {
        Some(schema::USER) => Some(Node::User(from_row(row)?)),
        Some(schema::POST) => Some(Node::Post(from_row(row)?)),
        Some(schema::REACTION) => Some(Node::Reaction(from_row(row)?)),
        _ => None,
    })
}

pub(crate) fn assigned_uid(assigned: &Assigned, blank: &str) -> StoreResult<Uid> {
    assigned.get(blank).copied().ok_or_else(|| {
        StoreError::invalid_operation(format!("no uid assigned to blank node {blank}"))
    })
}

pub(crate) fn from_row<T: DeserializeOwned>(row: Value) -> StoreResult<T> {
    serde_json::from_value(row).map_err(|source| StoreError::Decode {
        target: std::any::type_name::<T>(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dgql_graph::{FaultPoint, MemoryGraph, Mutation};
    use serde_json::json;
    use std::time::Duration;

    fn note(txn: &mut Txn) -> StoreResult<Uid> {
        let assigned = txn.mutate(&Mutation::set(json!({"uid": "_:n", "Note.text": "x"})))?;
        assigned
            .get("n")
            .copied()
            .ok_or_else(|| StoreError::invalid_operation("no uid"))
    }

    #[test]
    fn open_scope_requires_connection() {
        let graph = MemoryGraph::builder().disconnected().build();
        let store = Store::new(graph.clone());
        assert!(matches!(
            store.open_scope(&Context::new()),
            Err(StoreError::ConnectionInactive)
        ));
        assert_eq!(graph.stats().begun, 0);
    }

    #[test]
    fn open_scope_rejects_canceled_context() {
        let graph = MemoryGraph::new();
        let store = Store::new(graph.clone());
        let ctx = Context::new();
        ctx.cancel();
        assert!(matches!(store.open_scope(&ctx), Err(StoreError::Canceled)));
        assert_eq!(graph.stats().begun, 0);
    }

    #[test]
    fn transact_commits_and_returns_value() {
        let graph = MemoryGraph::new();
        let store = Store::new(graph.clone());
        let uid = store.transact(&Context::new(), note).unwrap();
        assert_eq!(uid, Uid::new(1));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn transact_rolls_back_on_error() {
        let graph = MemoryGraph::new();
        let store = Store::new(graph.clone());
        let err = store
            .transact(&Context::new(), |txn| {
                note(txn)?;
                Err::<(), _>(StoreError::not_found("user", "u"))
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.stats().discards, 1);
    }

    #[test]
    fn transact_reports_commit_failure() {
        let graph = MemoryGraph::new();
        graph.faults().fail_next(FaultPoint::Commit);
        let store = Store::new(graph.clone());
        let err = store.transact(&Context::new(), note).unwrap_err();
        assert!(matches!(err, StoreError::Commit(_)));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn scope_timeout_is_applied() {
        let graph = MemoryGraph::new();
        let store = Store::with_config(
            graph,
            StoreConfig::new().scope_timeout(Duration::from_secs(60)),
        );
        let mut scope = store.open_scope(&Context::new()).unwrap();
        assert!(scope.txn().context().deadline().is_some());
        scope.finalize().unwrap();
    }

    #[test]
    fn unbounded_scope_timeout_opens_scope() {
        let graph = MemoryGraph::new();
        let store = Store::with_config(
            graph.clone(),
            StoreConfig::new().scope_timeout(Duration::MAX),
        );
        store.transact(&Context::new(), note).unwrap();
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn scope_ids_increase() {
        let store = Store::new(MemoryGraph::new());
        let ctx = Context::new();
        let first = store.open_scope(&ctx).unwrap();
        let second = store.open_scope(&ctx).unwrap();
        assert!(second.id() > first.id());
        first.finalize().unwrap();
        second.finalize().unwrap();
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Store>();
    }
}
