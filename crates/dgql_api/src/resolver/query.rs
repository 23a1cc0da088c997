//! Query fields: `user`, `post` and `reaction` by ID.
//!
//! An unknown ID resolves to `None` without an error; a malformed one is
//! invalid input.

use super::{PostView, ReactionView, Resolver, UserView};
use crate::context::RequestContext;
use crate::error::ApiResult;

impl Resolver {
    /// Resolves `user(id)`.
    pub fn user(&self, ctx: &RequestContext, id: &str) -> Option<UserView> {
        let result = self.try_user(ctx, id);
        self.settle(ctx, "user", result).flatten()
    }

    /// Resolves `user(id)`.
    ///
    /// # Errors
    ///
    /// Invalid input for a malformed ID, or the store error.
    pub fn try_user(&self, ctx: &RequestContext, id: &str) -> ApiResult<Option<UserView>> {
        let id = self.validator.id("id", id)?;
        let user = self.store.user(ctx.context(), &id)?;
        Ok(user.map(|user| UserView::new(self.clone(), user)))
    }

    /// Resolves `post(id)`.
    pub fn post(&self, ctx: &RequestContext, id: &str) -> Option<PostView> {
        let result = self.try_post(ctx, id);
        self.settle(ctx, "post", result).flatten()
    }

    /// Resolves `post(id)`.
    ///
    /// # Errors
    ///
    /// Invalid input for a malformed ID, or the store error.
    pub fn try_post(&self, ctx: &RequestContext, id: &str) -> ApiResult<Option<PostView>> {
        let id = self.validator.id("id", id)?;
        let post = self.store.post(ctx.context(), &id)?;
        Ok(post.map(|post| PostView::new(self.clone(), post)))
    }

    /// Resolves `reaction(id)`.
    pub fn reaction(&self, ctx: &RequestContext, id: &str) -> Option<ReactionView> {
        let result = self.try_reaction(ctx, id);
        self.settle(ctx, "reaction", result).flatten()
    }

    /// Resolves `reaction(id)`.
    ///
    /// # Errors
    ///
    /// Invalid input for a malformed ID, or the store error.
    pub fn try_reaction(&self, ctx: &RequestContext, id: &str) -> ApiResult<Option<ReactionView>> {
        let id = self.validator.id("id", id)?;
        let reaction = self.store.reaction(ctx.context(), &id)?;
        Ok(reaction.map(|reaction| ReactionView::new(self.clone(), reaction)))
    }
}
