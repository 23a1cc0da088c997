//! Field resolvers.
//!
//! Every mutation resolver follows the same pipeline: authorize the
//! caller, validate the input, capture the creation timestamp, persist
//! through the store and project the committed entity into a view. The
//! first failing step ends the request.
//!
//! Each operation comes in two shapes. `try_*` returns an [`ApiResult`];
//! the plain form is what field dispatch calls: it records the error on
//! the [`RequestContext`] and returns `None`.

mod create_post;
mod create_reaction;
mod query;
mod views;

pub use create_post::CreatePostParams;
pub use create_reaction::CreateReactionParams;
pub use views::{PostView, ReactionView, SubjectView, UserView};

use crate::auth::{Authorizer, Requirement, SessionAuthorizer};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::validator::Validator;
use chrono::{DateTime, SubsecRound, Utc};
use dgql_store::Store;
use std::fmt;
use std::sync::Arc;

/// Resolves API fields against a [`Store`].
///
/// Cheap to clone; views keep a clone to resolve nested fields.
#[derive(Clone)]
pub struct Resolver {
    store: Store,
    validator: Validator,
    authorizer: Arc<dyn Authorizer>,
}

impl Resolver {
    /// Creates a resolver with the default validator and the
    /// [`SessionAuthorizer`] policy.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            validator: Validator::default(),
            authorizer: Arc::new(SessionAuthorizer),
        }
    }

    /// Replaces the validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Replaces the authorization policy.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Arc::new(authorizer);
        self
    }

    /// Returns the store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the validator.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    fn authorize(&self, ctx: &RequestContext, requirement: &Requirement) -> ApiResult<()> {
        self.authorizer
            .authorize(ctx, requirement)
            .map_err(ApiError::from)
    }

    /// Records a failed field on the request and converts to `Option`.
    fn settle<T>(&self, ctx: &RequestContext, field: &'static str, result: ApiResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(field, kind = %err.kind(), error = %err, "resolver failed");
                ctx.record(err);
                None
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("store", &self.store)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

/// Creation time for a new entity.
///
/// Microsecond precision so the persisted form reads back equal.
fn creation_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn creation_time_has_microsecond_precision() {
        let t = creation_time();
        assert_eq!(t.nanosecond() % 1_000, 0);
    }
}
