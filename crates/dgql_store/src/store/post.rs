//! Post operations.

use super::{assigned_uid, Rows, Store};
use crate::context::Context;
use crate::entity::{Id, NodeRef, Post};
use crate::error::{StoreError, StoreResult};
use crate::schema;
use crate::transaction::{vars, Txn};
use chrono::{DateTime, Utc};
use dgql_graph::{Mutation, Uid};
use serde_json::json;

impl Store {
    /// Creates a post published by `author`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the author does not exist, plus the
    /// usual scope errors.
    pub fn create_post(
        &self,
        ctx: &Context,
        creation: DateTime<Utc>,
        author: &Id,
        title: &str,
        contents: &str,
    ) -> StoreResult<Post> {
        let id = Id::new();
        let (uid, author_uid) = self.transact(ctx, |txn| {
            let author_uid =
                user_uid(txn, author)?.ok_or_else(|| StoreError::not_found("user", author))?;
            let assigned = txn.mutate(&Mutation::set(json!([
                {
                    "uid": "_:post",
                    "dgraph.type": schema::POST,
                    "Post.id": id,
                    "Post.creation": creation,
                    "Post.author": {"uid": author_uid},
                    "Post.title": title,
                    "Post.contents": contents,
                },
                {
                    "uid": author_uid,
                    "User.posts": [{"uid": "_:post"}],
                },
            ])))?;
            Ok((assigned_uid(&assigned, "post")?, author_uid))
        })?;

        tracing::debug!(%uid, %id, "post created");
        Ok(Post {
            uid,
            id,
            creation,
            author: NodeRef::from(author_uid),
            title: title.to_owned(),
            contents: contents.to_owned(),
        })
    }

    /// Looks up a post by domain ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope or the query fails.
    pub fn post(&self, ctx: &Context, id: &Id) -> StoreResult<Option<Post>> {
        self.transact(ctx, |txn| {
            let query = format!(
                "query post($id: string) {{ node(func: eq(Post.id, $id)) {{ {} }} }}",
                schema::POST_FIELDS
            );
            let rows: Rows<Post> = txn.query_with_vars(&query, &vars([("$id", id.as_str())]))?;
            Ok(rows.first())
        })
    }
}

/// Resolves a user's uid from their domain ID.
pub(crate) fn user_uid(txn: &mut Txn, id: &Id) -> StoreResult<Option<Uid>> {
    let rows: Rows<NodeRef> = txn.query_with_vars(
        "query user($id: string) { node(func: eq(User.id, $id)) { uid } }",
        &vars([("$id", id.as_str())]),
    )?;
    Ok(rows.first().map(|node| node.uid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dgql_graph::MemoryGraph;

    #[test]
    fn create_and_find_post() {
        let graph = MemoryGraph::new();
        let store = Store::new(graph.clone());
        let ctx = Context::new();
        let author = store
            .create_user(&ctx, Utc::now(), "ada@example.com", "Ada")
            .unwrap();

        let post = store
            .create_post(&ctx, Utc::now(), &author.id, "Hello", "First post")
            .unwrap();
        assert_eq!(post.author.uid, author.uid);
        assert_eq!(store.post(&ctx, &post.id).unwrap(), Some(post));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn unknown_author_is_not_found() {
        let graph = MemoryGraph::new();
        let store = Store::new(graph.clone());
        let err = store
            .create_post(&Context::new(), Utc::now(), &Id::new(), "t", "c")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "user", .. }));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.stats().discards, 1);
    }
}
