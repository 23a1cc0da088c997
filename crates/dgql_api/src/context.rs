//! Per-request context.

use crate::auth::Session;
use crate::error::{ApiError, ResponseError};
use dgql_store::{Context, Id};
use parking_lot::Mutex;

/// State of one incoming request.
///
/// Carries the cancellation [`Context`] passed to the store, the caller's
/// [`Session`], and the errors recorded by field resolvers for the
/// transport layer to surface.
#[derive(Debug, Default)]
pub struct RequestContext {
    ctx: Context,
    session: Option<Session>,
    errors: Mutex<Vec<ApiError>>,
}

impl RequestContext {
    /// Creates a context for a request without a session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a context for a request made by `user_id`.
    pub fn for_user(user_id: Id) -> Self {
        Self::anonymous().with_session(Session::new(user_id))
    }

    /// Sets the session.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the cancellation context.
    #[must_use]
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.ctx = ctx;
        self
    }

    /// Returns the cancellation context.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Returns the caller's session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Records an error for the response.
    pub fn record(&self, err: ApiError) {
        self.errors.lock().push(err);
    }

    /// Returns true if any error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    /// Returns the transport-facing form of the recorded errors.
    pub fn responses(&self) -> Vec<ResponseError> {
        self.errors.lock().iter().map(ApiError::to_response).collect()
    }

    /// Removes and returns the recorded errors.
    pub fn take_errors(&self) -> Vec<ApiError> {
        std::mem::take(&mut *self.errors.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn records_errors_in_order() {
        let ctx = RequestContext::anonymous();
        assert!(!ctx.has_errors());

        ctx.record(ApiError::invalid_input("a", "x"));
        ctx.record(ApiError::invalid_input("b", "y"));
        let kinds: Vec<_> = ctx.responses().into_iter().map(|r| r.kind).collect();
        assert_eq!(kinds, [ErrorKind::InvalidInput, ErrorKind::InvalidInput]);

        assert_eq!(ctx.take_errors().len(), 2);
        assert!(!ctx.has_errors());
    }

    #[test]
    fn session_is_optional() {
        assert!(RequestContext::anonymous().session().is_none());
        let user = Id::new();
        let ctx = RequestContext::for_user(user.clone());
        assert_eq!(ctx.session().map(|s| &s.user_id), Some(&user));
    }
}
