//! # dgql Store
//!
//! Transaction scopes and the entity store.
//!
//! This crate provides:
//! - [`Txn`] - the handle for queries and mutations inside one transaction
//! - [`Scope`] - commit-on-success / rollback-on-failure around a handle
//! - [`Store`] - users, posts and reactions on top of scopes
//! - [`Context`] - cancellation and deadlines for every operation
//!
//! ## Scopes
//!
//! Every store operation runs in exactly one scope. A scope commits only
//! if nothing failed; a failed commit is reported as a failure of the
//! whole operation, and a failed rollback is reported together with the
//! error that caused it. Entities are returned only after their scope
//! committed.
//!
//! ```rust
//! use dgql_graph::{MemoryGraph, Mutation};
//! use dgql_store::{Context, Store, StoreError};
//! use serde_json::json;
//!
//! let graph = MemoryGraph::new();
//! let store = Store::new(graph.clone());
//!
//! let result: Result<(), StoreError> = store.transact(&Context::new(), |txn| {
//!     txn.mutate(&Mutation::set(json!({"Note.text": "draft"})))?;
//!     Err(StoreError::invalid_operation("changed my mind"))
//! });
//! assert!(result.is_err());
//! assert_eq!(graph.node_count(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod context;
mod entity;
mod error;
pub mod schema;
mod store;
mod transaction;

pub use config::StoreConfig;
pub use context::Context;
pub use entity::{Emotion, Id, InvalidId, NodeRef, Post, Reaction, Subject, UnknownEmotion, User};
pub use error::{StoreError, StoreResult};
pub use store::Store;
pub use transaction::{vars, Scope, ScopeResult, Txn};

pub use dgql_graph::Uid;
