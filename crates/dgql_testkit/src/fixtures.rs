//! Test fixtures.
//!
//! Provides an in-process graph with a store on top of it and a small
//! seeded data set: two users and one post published by the first.

use chrono::Utc;
use dgql_graph::MemoryGraph;
use dgql_store::{Context, Post, Store, StoreConfig, User};

/// Predicates with a unique index in test graphs.
pub const UNIQUE_PREDICATES: &[&str] = &["User.email"];

/// Creates an empty graph with the unique indexes used by the store.
pub fn test_graph() -> MemoryGraph {
    UNIQUE_PREDICATES
        .iter()
        .fold(MemoryGraph::builder(), |builder, predicate| {
            builder.unique(*predicate)
        })
        .build()
}

/// A seeded store over an in-process graph.
pub struct Fixture {
    /// The graph, for fault injection and stats.
    pub graph: MemoryGraph,
    /// The store over `graph`.
    pub store: Store,
    /// A fresh context.
    pub ctx: Context,
    /// Author of `post`.
    pub owner: User,
    /// A second user.
    pub other: User,
    /// A post published by `owner`.
    pub post: Post,
}

impl Fixture {
    /// Creates a seeded fixture with the default store configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a seeded fixture with the given store configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        let graph = test_graph();
        let store = Store::with_config(graph.clone(), config);
        let ctx = Context::new();

        let owner = store
            .create_user(&ctx, Utc::now(), "owner@example.com", "Owner")
            .expect("Failed to create owner");
        let other = store
            .create_user(&ctx, Utc::now(), "other@example.com", "Other")
            .expect("Failed to create second user");
        let post = store
            .create_post(&ctx, Utc::now(), &owner.id, "Hello", "First post")
            .expect("Failed to create post");

        Self {
            graph,
            store,
            ctx,
            owner,
            other,
            post,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
