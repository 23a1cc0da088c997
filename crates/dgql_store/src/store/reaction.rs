//! Reaction operations.

use super::{assigned_uid, Rows, Store};
use crate::context::Context;
use crate::entity::{Emotion, Id, NodeRef, Reaction};
use crate::error::{StoreError, StoreResult};
use crate::schema;
use crate::transaction::{vars, Txn};
use chrono::{DateTime, Utc};
use dgql_graph::Mutation;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Uids of a reaction's author and subject.
#[derive(Debug, Deserialize)]
struct Refs {
    #[serde(default)]
    author: Vec<NodeRef>,
    #[serde(default)]
    post: Vec<NodeRef>,
    #[serde(default)]
    reaction: Vec<NodeRef>,
}

const REFS_QUERY: &str = "query refs($author: string, $subject: string) {
    author(func: eq(User.id, $author)) { uid }
    post(func: eq(Post.id, $subject)) { uid }
    reaction(func: eq(Reaction.id, $subject)) { uid }
}";

#[derive(Debug, Deserialize)]
struct Attached {
    #[serde(default)]
    post: Vec<Holder>,
    #[serde(default)]
    reaction: Vec<Holder>,
}

#[derive(Debug, Deserialize)]
struct Holder {
    #[serde(rename = "Post.reactions", alias = "Reaction.reactions", default)]
    reactions: Vec<Reaction>,
}

impl Store {
    /// Creates a reaction of `author` to `subject`, a post or a reaction.
    ///
    /// Runs in one scope: the author and subject uids are resolved, then a
    /// single mutation creates the reaction node with its edges and links
    /// it from the author and the subject. The reaction is returned only
    /// after the scope committed.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the author or the subject does not
    /// exist, plus the usual scope errors.
    pub fn create_reaction(
        &self,
        ctx: &Context,
        creation: DateTime<Utc>,
        author: &Id,
        subject: &Id,
        emotion: Emotion,
        message: &str,
    ) -> StoreResult<Reaction> {
        let id = Id::new();
        let (uid, author_uid, subject_uid) = self.transact(ctx, |txn| {
            let refs: Refs = txn.query_with_vars(
                REFS_QUERY,
                &vars([("$author", author.as_str()), ("$subject", subject.as_str())]),
            )?;
            let author_uid = refs
                .author
                .first()
                .map(|node| node.uid)
                .ok_or_else(|| StoreError::not_found("user", author))?;
            let (subject_uid, inverse) = match (refs.post.first(), refs.reaction.first()) {
                (Some(post), _) => (post.uid, schema::POST_REACTIONS),
                (None, Some(reaction)) => (reaction.uid, schema::REACTION_REACTIONS),
                (None, None) => return Err(StoreError::not_found("subject", subject)),
            };

            let mut subject_node = Map::new();
            subject_node.insert("uid".into(), json!(subject_uid));
            subject_node.insert(inverse.into(), json!([{"uid": "_:reaction"}]));

            let assigned = txn.mutate(&Mutation::set(json!([
                {
                    "uid": "_:reaction",
                    "dgraph.type": schema::REACTION,
                    "Reaction.id": id,
                    "Reaction.creation": creation,
                    "Reaction.author": {"uid": author_uid},
                    "Reaction.subject": {"uid": subject_uid},
                    "Reaction.emotion": emotion,
                    "Reaction.message": message,
                },
                {
                    "uid": author_uid,
                    "User.publishedReactions": [{"uid": "_:reaction"}],
                },
                Value::Object(subject_node),
            ])))?;
            Ok((assigned_uid(&assigned, "reaction")?, author_uid, subject_uid))
        })?;

        tracing::debug!(%uid, %id, subject = %subject_uid, "reaction created");
        Ok(Reaction {
            uid,
            id,
            creation,
            author: NodeRef::from(author_uid),
            subject: NodeRef::from(subject_uid),
            emotion,
            message: message.to_owned(),
        })
    }

    /// Looks up a reaction by domain ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope or the query fails.
    pub fn reaction(&self, ctx: &Context, id: &Id) -> StoreResult<Option<Reaction>> {
        self.transact(ctx, |txn| {
            let query = format!(
                "query reaction($id: string) {{ node(func: eq(Reaction.id, $id)) {{ {} }} }}",
                schema::REACTION_FIELDS
            );
            let rows: Rows<Reaction> = txn.query_with_vars(&query, &vars([("$id", id.as_str())]))?;
            Ok(rows.first())
        })
    }

    /// Returns the reactions attached to a post or reaction, oldest first.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no post or reaction has `subject` as
    /// its ID, plus the usual scope errors.
    pub fn reactions_of(&self, ctx: &Context, subject: &Id) -> StoreResult<Vec<Reaction>> {
        self.transact(ctx, |txn| attached_reactions(txn, subject))
    }
}

fn attached_reactions(txn: &mut Txn, subject: &Id) -> StoreResult<Vec<Reaction>> {
    let query = format!(
        "query reactions($id: string) {{
            post(func: eq(Post.id, $id)) {{ {inverse_post} {{ {fields} }} }}
            reaction(func: eq(Reaction.id, $id)) {{ {inverse_reaction} {{ {fields} }} }}
        }}",
        inverse_post = schema::POST_REACTIONS,
        inverse_reaction = schema::REACTION_REACTIONS,
        fields = schema::REACTION_FIELDS,
    );
    let attached: Attached = txn.query_with_vars(&query, &vars([("$id", subject.as_str())]))?;
    let holder = attached
        .post
        .into_iter()
        .chain(attached.reaction)
        .next()
        .ok_or_else(|| StoreError::not_found("subject", subject))?;

    // uids are allocated in creation order
    let mut reactions = holder.reactions;
    reactions.sort_by_key(|reaction| reaction.uid);
    Ok(reactions)
}
