//! Reaction emotions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The emotion a reaction expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Happiness.
    Joy,
    /// Enthusiasm.
    Excitement,
    /// Disagreement or annoyance.
    Anger,
    /// Sorrow.
    Sadness,
    /// Worry.
    Fear,
    /// Reflection.
    Thoughtfulness,
}

/// A string that names no [`Emotion`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion {0:?}")]
pub struct UnknownEmotion(pub String);

impl Emotion {
    /// Every emotion, in declaration order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Excitement,
        Emotion::Anger,
        Emotion::Sadness,
        Emotion::Fear,
        Emotion::Thoughtfulness,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Excitement => "excitement",
            Emotion::Anger => "anger",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
            Emotion::Thoughtfulness => "thoughtfulness",
        }
    }
}

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownEmotion(s.to_owned()))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
