//! # dgql Testkit
//!
//! Test utilities for dgql.
//!
//! This crate provides:
//! - Fixtures: an in-process graph with a store and seeded users and a post
//! - Property-based test generators using proptest
//! - Test logging setup
//!
//! ## Usage
//!
//! ```rust
//! use dgql_testkit::prelude::*;
//!
//! init_tracing();
//! let fixture = Fixture::new();
//! assert_eq!(fixture.graph.node_count(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::init_tracing;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::init_tracing;
