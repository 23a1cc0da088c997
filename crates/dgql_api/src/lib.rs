//! # dgql API
//!
//! Request-facing resolvers for users, posts and reactions.
//!
//! This crate provides:
//! - [`Resolver`] - authorize, validate, timestamp, persist and project
//! - [`RequestContext`] - session, cancellation and recorded errors of a request
//! - [`Authorizer`] - the authorization policy seam
//! - [`Validator`] - per-field input checks
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use dgql_api::{CreateReactionParams, RequestContext, Resolver};
//! use dgql_graph::MemoryGraph;
//! use dgql_store::{Context, Store};
//!
//! let store = Store::new(MemoryGraph::new());
//! let ctx = Context::new();
//! let user = store.create_user(&ctx, Utc::now(), "ada@example.com", "Ada").unwrap();
//! let post = store.create_post(&ctx, Utc::now(), &user.id, "Hi", "Hello").unwrap();
//!
//! let resolver = Resolver::new(store);
//! let request = RequestContext::for_user(user.id.clone());
//! let view = resolver
//!     .create_reaction(&request, CreateReactionParams {
//!         author: user.id.to_string(),
//!         subject: post.id.to_string(),
//!         emotion: "joy".into(),
//!         message: "nice!".into(),
//!     })
//!     .unwrap();
//! assert_eq!(view.message(), "nice!");
//! assert!(!request.has_errors());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod auth;
mod context;
mod error;
mod resolver;
mod validator;

pub use auth::{AuthError, Authorizer, Requirement, Session, SessionAuthorizer};
pub use context::RequestContext;
pub use error::{ApiError, ApiResult, ErrorKind, ResponseError};
pub use resolver::{
    CreatePostParams, CreateReactionParams, PostView, ReactionView, Resolver, SubjectView,
    UserView,
};
pub use validator::{Validator, ValidatorConfig};
