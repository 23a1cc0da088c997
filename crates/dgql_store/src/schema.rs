//! Graph predicates and field selections used by the store.

/// Predicate holding a node's type name.
pub const TYPE: &str = "dgraph.type";

/// Type name of user nodes.
pub const USER: &str = "User";
/// Type name of post nodes.
pub const POST: &str = "Post";
/// Type name of reaction nodes.
pub const REACTION: &str = "Reaction";

/// Inverse edge from a user to the posts they published.
pub const USER_POSTS: &str = "User.posts";
/// Inverse edge from a user to the reactions they published.
pub const USER_PUBLISHED_REACTIONS: &str = "User.publishedReactions";
/// Inverse edge from a post to its reactions.
pub const POST_REACTIONS: &str = "Post.reactions";
/// Inverse edge from a reaction to the reactions on it.
pub const REACTION_REACTIONS: &str = "Reaction.reactions";

/// Predicates decoded into [`crate::User`].
pub const USER_FIELDS: &str = "uid User.id User.creation User.email User.displayName";

/// Predicates decoded into [`crate::Post`].
pub const POST_FIELDS: &str =
    "uid Post.id Post.creation Post.author { uid } Post.title Post.contents";

/// Predicates decoded into [`crate::Reaction`].
pub const REACTION_FIELDS: &str = "uid Reaction.id Reaction.creation Reaction.author { uid } \
     Reaction.subject { uid } Reaction.emotion Reaction.message";
