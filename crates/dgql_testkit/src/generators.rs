//! Property-based test generators using proptest.

use dgql_store::Emotion;
use proptest::prelude::*;

/// Strategy for any emotion.
pub fn emotion_strategy() -> impl Strategy<Value = Emotion> {
    prop::sample::select(Emotion::ALL.to_vec())
}

/// Strategy for emotion strings, valid or not.
pub fn emotion_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        emotion_strategy().prop_map(|e| e.to_string()),
        "[a-zA-Z ]{0,16}",
    ]
}

/// Strategy for messages of 1 to `max` characters, including non-ASCII.
pub fn message_strategy(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 1..=max).prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for messages longer than `max` characters.
pub fn oversized_message_strategy(max: usize) -> impl Strategy<Value = String> {
    (max + 1..max + 64).prop_map(|len| "x".repeat(len))
}

/// A step of a scope, used to generate operation sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A mutation that succeeds.
    Write,
    /// A step that fails with an error.
    Fail,
}

/// Strategy for scope step sequences.
pub fn steps_strategy() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(prop_oneof![3 => Just(Step::Write), 1 => Just(Step::Fail)], 0..8)
}
