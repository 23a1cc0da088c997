//! Entities as decoded from graph query results.
//!
//! Field names follow the graph predicates (`Type.field`), so a query that
//! selects the predicates listed in [`crate::schema`] decodes directly into
//! these types.

use super::{Emotion, Id};
use chrono::{DateTime, Utc};
use dgql_graph::Uid;
use serde::{Deserialize, Serialize};

/// A weak reference to another node, by uid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    /// Uid of the referenced node.
    pub uid: Uid,
}

impl From<Uid> for NodeRef {
    fn from(uid: Uid) -> Self {
        Self { uid }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Store-assigned uid.
    pub uid: Uid,
    /// Domain ID.
    #[serde(rename = "User.id")]
    pub id: Id,
    /// Creation time.
    #[serde(rename = "User.creation")]
    pub creation: DateTime<Utc>,
    /// Email address, unique across users.
    #[serde(rename = "User.email")]
    pub email: String,
    /// Display name.
    #[serde(rename = "User.displayName")]
    pub display_name: String,
}

/// A post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Store-assigned uid.
    pub uid: Uid,
    /// Domain ID.
    #[serde(rename = "Post.id")]
    pub id: Id,
    /// Creation time.
    #[serde(rename = "Post.creation")]
    pub creation: DateTime<Utc>,
    /// The user who published the post.
    #[serde(rename = "Post.author")]
    pub author: NodeRef,
    /// Title.
    #[serde(rename = "Post.title")]
    pub title: String,
    /// Body text.
    #[serde(rename = "Post.contents")]
    pub contents: String,
}

/// A reaction to a post or to another reaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reaction {
    /// Store-assigned uid.
    pub uid: Uid,
    /// Domain ID.
    #[serde(rename = "Reaction.id")]
    pub id: Id,
    /// Creation time.
    #[serde(rename = "Reaction.creation")]
    pub creation: DateTime<Utc>,
    /// The user who reacted.
    #[serde(rename = "Reaction.author")]
    pub author: NodeRef,
    /// The post or reaction reacted to.
    #[serde(rename = "Reaction.subject")]
    pub subject: NodeRef,
    /// Emotion.
    #[serde(rename = "Reaction.emotion")]
    pub emotion: Emotion,
    /// Free-text message.
    #[serde(rename = "Reaction.message")]
    pub message: String,
}

/// Something a reaction can be attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A post.
    Post(Post),
    /// Another reaction.
    Reaction(Reaction),
}

impl Subject {
    /// Returns the subject's uid.
    #[must_use]
    pub fn uid(&self) -> Uid {
        match self {
            Subject::Post(post) => post.uid,
            Subject::Reaction(reaction) => reaction.uid,
        }
    }

    /// Returns the subject's domain ID.
    #[must_use]
    pub fn id(&self) -> &Id {
        match self {
            Subject::Post(post) => &post.id,
            Subject::Reaction(reaction) => &reaction.id,
        }
    }
}
