//! Authorization.
//!
//! Resolvers state what the caller must satisfy as a [`Requirement`] and
//! ask an [`Authorizer`] before looking at any other input.

use crate::context::RequestContext;
use dgql_store::Id;
use thiserror::Error;

/// A capability the caller must have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The caller has a session.
    IsAuthenticated,
    /// The caller is the user with this ID.
    ///
    /// The ID is kept as given by the request; a malformed ID simply
    /// never matches.
    IsOwner {
        /// Domain ID of the owner.
        owner: String,
    },
}

impl Requirement {
    /// Creates an ownership requirement.
    pub fn is_owner(owner: impl Into<String>) -> Self {
        Self::IsOwner {
            owner: owner.into(),
        }
    }
}

/// Why a requirement was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The request has no session.
    #[error("no active session")]
    Unauthenticated,

    /// The caller is not the owner.
    #[error("caller is not the owner {owner:?}")]
    NotOwner {
        /// The required owner.
        owner: String,
    },
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Domain ID of the calling user.
    pub user_id: Id,
}

impl Session {
    /// Creates a session for a user.
    pub fn new(user_id: Id) -> Self {
        Self { user_id }
    }
}

/// Authorization policy.
pub trait Authorizer: Send + Sync {
    /// Checks `requirement` for the caller of `ctx`.
    ///
    /// # Errors
    ///
    /// Returns why the requirement is not met.
    fn authorize(&self, ctx: &RequestContext, requirement: &Requirement) -> Result<(), AuthError>;
}

/// Default policy: checks requirements against the request's session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionAuthorizer;

impl Authorizer for SessionAuthorizer {
    fn authorize(&self, ctx: &RequestContext, requirement: &Requirement) -> Result<(), AuthError> {
        let session = ctx.session().ok_or(AuthError::Unauthenticated)?;
        match requirement {
            Requirement::IsAuthenticated => Ok(()),
            Requirement::IsOwner { owner } if session.user_id.as_str() == owner => Ok(()),
            Requirement::IsOwner { owner } => Err(AuthError::NotOwner {
                owner: owner.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_caller_is_unauthenticated() {
        let ctx = RequestContext::anonymous();
        assert_eq!(
            SessionAuthorizer.authorize(&ctx, &Requirement::IsAuthenticated),
            Err(AuthError::Unauthenticated)
        );
        assert_eq!(
            SessionAuthorizer.authorize(&ctx, &Requirement::is_owner("x")),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn owner_check_compares_session_user() {
        let user = Id::new();
        let ctx = RequestContext::for_user(user.clone());

        assert!(SessionAuthorizer
            .authorize(&ctx, &Requirement::is_owner(user.as_str()))
            .is_ok());
        assert!(SessionAuthorizer
            .authorize(&ctx, &Requirement::IsAuthenticated)
            .is_ok());
        assert_eq!(
            SessionAuthorizer.authorize(&ctx, &Requirement::is_owner("someone-else")),
            Err(AuthError::NotOwner {
                owner: "someone-else".into()
            })
        );
    }
}
