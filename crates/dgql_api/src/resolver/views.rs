//! Response views.
//!
//! A view is built only from a committed entity. Scalar accessors copy
//! fields; nested fields go back through the resolver and record their
//! errors on the request context like any other field.

use super::Resolver;
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use dgql_store::{Emotion, Id, Post, Reaction, StoreError, Subject, Uid, User};
use std::fmt;

/// A user in a response.
#[derive(Clone)]
pub struct UserView {
    resolver: Resolver,
    user: User,
}

/// A post in a response.
#[derive(Clone)]
pub struct PostView {
    resolver: Resolver,
    post: Post,
}

/// A reaction in a response.
#[derive(Clone)]
pub struct ReactionView {
    resolver: Resolver,
    reaction: Reaction,
}

/// What a reaction was attached to.
#[derive(Debug, Clone)]
pub enum SubjectView {
    /// A post.
    Post(PostView),
    /// Another reaction.
    Reaction(ReactionView),
}

impl UserView {
    pub(crate) fn new(resolver: Resolver, user: User) -> Self {
        Self { resolver, user }
    }

    /// Store-assigned uid.
    pub fn uid(&self) -> Uid {
        self.user.uid
    }

    /// Domain ID.
    pub fn id(&self) -> &Id {
        &self.user.id
    }

    /// Creation time.
    pub fn creation(&self) -> DateTime<Utc> {
        self.user.creation
    }

    /// Email address.
    pub fn email(&self) -> &str {
        &self.user.email
    }

    /// Display name.
    pub fn display_name(&self) -> &str {
        &self.user.display_name
    }

    /// The projected entity.
    pub fn entity(&self) -> &User {
        &self.user
    }
}

impl PostView {
    pub(crate) fn new(resolver: Resolver, post: Post) -> Self {
        Self { resolver, post }
    }

    /// Store-assigned uid.
    pub fn uid(&self) -> Uid {
        self.post.uid
    }

    /// Domain ID.
    pub fn id(&self) -> &Id {
        &self.post.id
    }

    /// Creation time.
    pub fn creation(&self) -> DateTime<Utc> {
        self.post.creation
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.post.title
    }

    /// Body text.
    pub fn contents(&self) -> &str {
        &self.post.contents
    }

    /// The projected entity.
    pub fn entity(&self) -> &Post {
        &self.post
    }

    /// Resolves the publishing user.
    pub fn author(&self, ctx: &RequestContext) -> Option<UserView> {
        let result = self.resolver.user_at(ctx, self.post.author.uid);
        self.resolver.settle(ctx, "Post.author", result)
    }

    /// Resolves the reactions to this post, oldest first.
    pub fn reactions(&self, ctx: &RequestContext) -> Option<Vec<ReactionView>> {
        let result = self.resolver.reactions_to(ctx, &self.post.id);
        self.resolver.settle(ctx, "Post.reactions", result)
    }
}

impl ReactionView {
    pub(crate) fn new(resolver: Resolver, reaction: Reaction) -> Self {
        Self { resolver, reaction }
    }

    /// Store-assigned uid.
    pub fn uid(&self) -> Uid {
        self.reaction.uid
    }

    /// Domain ID.
    pub fn id(&self) -> &Id {
        &self.reaction.id
    }

    /// Creation time.
    pub fn creation(&self) -> DateTime<Utc> {
        self.reaction.creation
    }

    /// Emotion.
    pub fn emotion(&self) -> Emotion {
        self.reaction.emotion
    }

    /// Free-text message.
    pub fn message(&self) -> &str {
        &self.reaction.message
    }

    /// The projected entity.
    pub fn entity(&self) -> &Reaction {
        &self.reaction
    }

    /// Resolves the reacting user.
    pub fn author(&self, ctx: &RequestContext) -> Option<UserView> {
        let result = self.resolver.user_at(ctx, self.reaction.author.uid);
        self.resolver.settle(ctx, "Reaction.author", result)
    }

    /// Resolves the post or reaction this reaction is attached to.
    pub fn subject(&self, ctx: &RequestContext) -> Option<SubjectView> {
        let resolver = &self.resolver;
        let uid = self.reaction.subject.uid;
        let result = resolver
            .store
            .subject_by_uid(ctx.context(), uid)
            .map_err(ApiError::from)
            .and_then(|subject| {
                subject.ok_or_else(|| StoreError::not_found("subject", uid).into())
            })
            .map(|subject| match subject {
                Subject::Post(post) => SubjectView::Post(PostView::new(resolver.clone(), post)),
                Subject::Reaction(reaction) => {
                    SubjectView::Reaction(ReactionView::new(resolver.clone(), reaction))
                }
            });
        resolver.settle(ctx, "Reaction.subject", result)
    }

    /// Resolves the reactions to this reaction, oldest first.
    pub fn reactions(&self, ctx: &RequestContext) -> Option<Vec<ReactionView>> {
        let result = self.resolver.reactions_to(ctx, &self.reaction.id);
        self.resolver.settle(ctx, "Reaction.reactions", result)
    }
}

impl SubjectView {
    /// Domain ID of the subject.
    pub fn id(&self) -> &Id {
        match self {
            SubjectView::Post(post) => post.id(),
            SubjectView::Reaction(reaction) => reaction.id(),
        }
    }
}

impl Resolver {
    fn user_at(&self, ctx: &RequestContext, uid: Uid) -> ApiResult<UserView> {
        let user = self
            .store
            .user_by_uid(ctx.context(), uid)?
            .ok_or_else(|| StoreError::not_found("user", uid))?;
        Ok(UserView::new(self.clone(), user))
    }

    fn reactions_to(&self, ctx: &RequestContext, subject: &Id) -> ApiResult<Vec<ReactionView>> {
        let reactions = self.store.reactions_of(ctx.context(), subject)?;
        Ok(reactions
            .into_iter()
            .map(|reaction| ReactionView::new(self.clone(), reaction))
            .collect())
    }
}

impl fmt::Debug for UserView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserView").field(&self.user).finish()
    }
}

impl fmt::Debug for PostView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PostView").field(&self.post).finish()
    }
}

impl fmt::Debug for ReactionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReactionView").field(&self.reaction).finish()
    }
}
