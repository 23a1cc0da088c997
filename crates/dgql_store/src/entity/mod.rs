//! Domain entities and their identifiers.

mod emotion;
mod id;
mod model;

pub use emotion::{Emotion, UnknownEmotion};
pub use id::{Id, InvalidId};
pub use model::{NodeRef, Post, Reaction, Subject, User};
