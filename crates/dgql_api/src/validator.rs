//! Input validation.

use crate::error::{ApiError, ApiResult};
use dgql_store::{Emotion, Id};

/// Field limits, counted in characters.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Maximum length of a reaction message.
    pub max_reaction_message_len: usize,
    /// Maximum length of a post title.
    pub max_post_title_len: usize,
    /// Maximum length of a post body.
    pub max_post_contents_len: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_reaction_message_len: 256,
            max_post_title_len: 256,
            max_post_contents_len: 64 * 1024,
        }
    }
}

impl ValidatorConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum reaction message length.
    #[must_use]
    pub const fn max_reaction_message_len(mut self, len: usize) -> Self {
        self.max_reaction_message_len = len;
        self
    }

    /// Sets the maximum post title length.
    #[must_use]
    pub const fn max_post_title_len(mut self, len: usize) -> Self {
        self.max_post_title_len = len;
        self
    }

    /// Sets the maximum post body length.
    #[must_use]
    pub const fn max_post_contents_len(mut self, len: usize) -> Self {
        self.max_post_contents_len = len;
        self
    }
}

/// Per-field validation functions.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Creates a validator.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates a reaction message.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] naming `message`.
    pub fn reaction_message(&self, message: &str) -> ApiResult<()> {
        text("message", message, self.config.max_reaction_message_len)
    }

    /// Validates a post title.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] naming `title`.
    pub fn post_title(&self, title: &str) -> ApiResult<()> {
        text("title", title, self.config.max_post_title_len)
    }

    /// Validates a post body.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] naming `contents`.
    pub fn post_contents(&self, contents: &str) -> ApiResult<()> {
        text("contents", contents, self.config.max_post_contents_len)
    }

    /// Parses an emotion.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] naming `emotion`.
    pub fn emotion(&self, emotion: &str) -> ApiResult<Emotion> {
        emotion
            .parse()
            .map_err(|err| ApiError::invalid_input("emotion", format!("{err}")))
    }

    /// Parses a domain ID.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] naming `field`.
    pub fn id(&self, field: &'static str, id: &str) -> ApiResult<Id> {
        id.parse()
            .map_err(|err| ApiError::invalid_input(field, format!("{err}")))
    }
}

fn text(field: &'static str, value: &str, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ApiError::invalid_input(field, "must not be empty"));
    }
    if len > max {
        return Err(ApiError::invalid_input(
            field,
            format!("must be at most {max} characters, got {len}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ApiError) -> &'static str {
        match err {
            ApiError::InvalidInput { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn message_length_is_counted_in_chars() {
        let v = Validator::new(ValidatorConfig::new().max_reaction_message_len(3));
        assert!(v.reaction_message("abc").is_ok());
        assert!(v.reaction_message("äöü").is_ok());
        assert_eq!(field_of(v.reaction_message("abcd").unwrap_err()), "message");
        assert_eq!(field_of(v.reaction_message("").unwrap_err()), "message");
    }

    #[test]
    fn default_message_limit() {
        let v = Validator::default();
        assert!(v.reaction_message(&"x".repeat(256)).is_ok());
        let err = v.reaction_message(&"x".repeat(257)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: message: must be at most 256 characters, got 257"
        );
    }

    #[test]
    fn post_fields() {
        let v = Validator::new(
            ValidatorConfig::new()
                .max_post_title_len(5)
                .max_post_contents_len(10),
        );
        assert!(v.post_title("Hello").is_ok());
        assert_eq!(field_of(v.post_title("Hello!").unwrap_err()), "title");
        assert_eq!(field_of(v.post_contents("").unwrap_err()), "contents");
    }

    #[test]
    fn emotion_and_id_parsing() {
        let v = Validator::default();
        assert_eq!(v.emotion("joy").unwrap(), Emotion::Joy);
        assert_eq!(field_of(v.emotion("bliss").unwrap_err()), "emotion");

        let id = Id::new();
        assert_eq!(v.id("subject", id.as_str()).unwrap(), id);
        assert_eq!(field_of(v.id("subject", "nope").unwrap_err()), "subject");
    }
}
