//! The `createReaction` mutation.

use super::{creation_time, ReactionView, Resolver};
use crate::auth::Requirement;
use crate::context::RequestContext;
use crate::error::ApiResult;

/// Input of [`Resolver::create_reaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReactionParams {
    /// Domain ID of the reacting user. Must be the caller.
    pub author: String,
    /// Domain ID of the post or reaction reacted to.
    pub subject: String,
    /// Emotion name, e.g. `joy`.
    pub emotion: String,
    /// Free-text message.
    pub message: String,
}

impl Resolver {
    /// Resolves `createReaction`, recording any error on `ctx`.
    pub fn create_reaction(
        &self,
        ctx: &RequestContext,
        params: CreateReactionParams,
    ) -> Option<ReactionView> {
        let result = self.try_create_reaction(ctx, params);
        self.settle(ctx, "createReaction", result)
    }

    /// Resolves `createReaction`.
    ///
    /// # Errors
    ///
    /// - [`crate::ApiError::Unauthorized`] unless the caller is `author`.
    /// - [`crate::ApiError::InvalidInput`] for the first invalid field, in
    ///   the order message, emotion, author, subject.
    /// - [`crate::ApiError::Store`] if persisting fails, including
    ///   `NotFound` for an unknown author or subject.
    pub fn try_create_reaction(
        &self,
        ctx: &RequestContext,
        params: CreateReactionParams,
    ) -> ApiResult<ReactionView> {
        self.authorize(ctx, &Requirement::is_owner(params.author.as_str()))?;

        self.validator.reaction_message(&params.message)?;
        let emotion = self.validator.emotion(&params.emotion)?;
        let author = self.validator.id("author", &params.author)?;
        let subject = self.validator.id("subject", &params.subject)?;

        let creation = creation_time();
        let reaction = self.store.create_reaction(
            ctx.context(),
            creation,
            &author,
            &subject,
            emotion,
            &params.message,
        )?;

        Ok(ReactionView::new(self.clone(), reaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ErrorKind};
    use dgql_graph::MemoryGraph;
    use dgql_store::{Context, Emotion, Id, Store};

    fn setup() -> (Resolver, Id, Id) {
        let store = Store::new(MemoryGraph::new());
        let ctx = Context::new();
        let user = store
            .create_user(&ctx, creation_time(), "a@example.com", "A")
            .unwrap();
        let post = store
            .create_post(&ctx, creation_time(), &user.id, "T", "C")
            .unwrap();
        (Resolver::new(store), user.id, post.id)
    }

    fn params(author: &Id, subject: &Id) -> CreateReactionParams {
        CreateReactionParams {
            author: author.to_string(),
            subject: subject.to_string(),
            emotion: "joy".into(),
            message: "nice!".into(),
        }
    }

    #[test]
    fn creates_reaction_for_owner() {
        let (resolver, user, post) = setup();
        let ctx = RequestContext::for_user(user.clone());

        let view = resolver.try_create_reaction(&ctx, params(&user, &post)).unwrap();
        assert_eq!(view.emotion(), Emotion::Joy);
        assert_eq!(view.message(), "nice!");

        let stored = resolver
            .store()
            .reaction(ctx.context(), view.id())
            .unwrap()
            .unwrap();
        assert_eq!(&stored, view.entity());
    }

    #[test]
    fn unknown_subject_is_not_found() {
        let (resolver, user, _) = setup();
        let ctx = RequestContext::for_user(user.clone());

        let err = resolver
            .try_create_reaction(&ctx, params(&user, &Id::new()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn malformed_subject_is_invalid_input() {
        let (resolver, user, _) = setup();
        let ctx = RequestContext::for_user(user.clone());
        let mut input = params(&user, &Id::new());
        input.subject = "not-an-id".into();

        let err = resolver.try_create_reaction(&ctx, input).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput { field: "subject", .. }));
    }

    #[test]
    fn field_dispatch_records_error() {
        let (resolver, user, post) = setup();
        let ctx = RequestContext::anonymous();

        assert!(resolver.create_reaction(&ctx, params(&user, &post)).is_none());
        let errors = ctx.responses();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Unauthorized);
    }
}
