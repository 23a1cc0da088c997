//! The `createPost` mutation.

use super::{creation_time, PostView, Resolver};
use crate::auth::Requirement;
use crate::context::RequestContext;
use crate::error::ApiResult;

/// Input of [`Resolver::create_post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostParams {
    /// Domain ID of the publishing user. Must be the caller.
    pub author: String,
    /// Title.
    pub title: String,
    /// Body text.
    pub contents: String,
}

impl Resolver {
    /// Resolves `createPost`, recording any error on `ctx`.
    pub fn create_post(&self, ctx: &RequestContext, params: CreatePostParams) -> Option<PostView> {
        let result = self.try_create_post(ctx, params);
        self.settle(ctx, "createPost", result)
    }

    /// Resolves `createPost`.
    ///
    /// # Errors
    ///
    /// Same classes as [`Resolver::try_create_reaction`]; fields are
    /// checked in the order title, contents, author.
    pub fn try_create_post(
        &self,
        ctx: &RequestContext,
        params: CreatePostParams,
    ) -> ApiResult<PostView> {
        self.authorize(ctx, &Requirement::is_owner(params.author.as_str()))?;

        self.validator.post_title(&params.title)?;
        self.validator.post_contents(&params.contents)?;
        let author = self.validator.id("author", &params.author)?;

        let creation = creation_time();
        let post = self.store.create_post(
            ctx.context(),
            creation,
            &author,
            &params.title,
            &params.contents,
        )?;

        Ok(PostView::new(self.clone(), post))
    }
}
