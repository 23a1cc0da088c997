//! # dgql Graph
//!
//! Graph backend interface and an in-process transactional graph engine.
//!
//! This crate is the lowest layer of dgql. It defines the contract the
//! store expects from a graph database connection and ships one
//! implementation of it:
//!
//! - [`GraphBackend`] / [`GraphTxn`] - the connection and transaction traits
//! - [`MemoryGraph`] - an in-process graph with staged, atomic transactions
//! - a DQL subset for reads (`eq`, `uid`, `has`, `type` root functions)
//! - JSON set-mutations with blank-node assignment
//!
//! ## Design Principles
//!
//! - Transactions stage their writes; nothing is visible to other
//!   transactions until `commit`
//! - Query variables are resolved by the engine and never spliced into the
//!   query text
//! - Backends must be `Send + Sync` so many request workers can open
//!   transactions concurrently
//!
//! ## Example
//!
//! ```rust
//! use dgql_graph::{GraphBackend, MemoryGraph, Mutation};
//! use serde_json::json;
//!
//! let graph = MemoryGraph::new();
//! let mut txn = graph.new_txn();
//! let assigned = txn
//!     .mutate(&Mutation::set(json!({"uid": "_:alice", "User.id": "alice"})))
//!     .unwrap();
//! txn.commit().unwrap();
//!
//! let mut txn = graph.new_txn();
//! let raw = txn
//!     .query(r#"{ user(func: eq(User.id, "alice")) { uid } }"#)
//!     .unwrap();
//! let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
//! assert_eq!(json["user"][0]["uid"], assigned["alice"].to_string());
//! txn.discard().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod backend;
mod dql;
mod error;
mod memory;
mod mutation;
mod uid;

pub use backend::{Assigned, GraphBackend, GraphTxn, Vars};
pub use error::{GraphError, GraphResult};
pub use memory::{FaultInjector, FaultPoint, GraphStats, MemoryGraph, MemoryGraphBuilder, MemoryTxn};
pub use mutation::Mutation;
pub use uid::Uid;
