//! Store configuration.

use std::time::Duration;

/// Configuration for a [`crate::Store`].
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Deadline applied to every scope, on top of the caller's context.
    pub scope_timeout: Option<Duration>,
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-scope deadline.
    #[must_use]
    pub const fn scope_timeout(mut self, timeout: Duration) -> Self {
        self.scope_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        assert_eq!(StoreConfig::new().scope_timeout, None);
        let config = StoreConfig::new().scope_timeout(Duration::from_secs(2));
        assert_eq!(config.scope_timeout, Some(Duration::from_secs(2)));
    }
}
