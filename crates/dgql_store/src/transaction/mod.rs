//! Transaction handles and scopes.
//!
//! Every store operation runs inside one [`Scope`]:
//! - **Open**: the connection is checked before a graph transaction starts
//! - **Run**: queries and mutations go through the scope's [`Txn`]
//! - **Finalize**: commit if nothing failed, otherwise roll back
//!
//! A scope that is dropped unfinished rolls back.

mod handle;
mod scope;

pub use handle::{vars, Txn};
pub use scope::{Scope, ScopeResult};
