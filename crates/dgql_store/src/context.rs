//! Cancellation and deadline context.

use crate::error::{StoreError, StoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    canceled: AtomicBool,
}

/// Cancellation state carried by every store operation.
///
/// Clones and children share one cancel flag. A child may carry a tighter
/// deadline than its parent but never a looser one.
///
/// # Example
///
/// ```rust
/// use dgql_store::Context;
/// use std::time::Duration;
///
/// let ctx = Context::new();
/// let child = ctx.with_timeout(Duration::from_secs(5));
/// ctx.cancel();
/// assert!(child.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    inner: Arc<Inner>,
    deadline: Option<Instant>,
}

impl Context {
    /// Creates a context without a deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a child context that expires after `timeout`.
    ///
    /// A timeout too large to represent as an instant adds no deadline.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Returns a child context that expires at `deadline`, or at the
    /// parent's deadline if that is earlier.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };
        Self {
            inner: Arc::clone(&self.inner),
            deadline: Some(deadline),
        }
    }

    /// Requests cancellation of every operation sharing this context.
    pub fn cancel(&self) {
        self.inner.canceled.store(true, Ordering::Release);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.inner.canceled.load(Ordering::Acquire)
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns whether the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fails with [`StoreError::Canceled`] if the context is canceled or
    /// expired.
    pub fn check(&self) -> StoreResult<()> {
        if self.is_canceled() || self.is_expired() {
            Err(StoreError::Canceled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_observes_cancellation() {
        let ctx = Context::new();
        assert!(ctx.check().is_ok());
        ctx.clone().cancel();
        assert!(ctx.is_canceled());
        assert!(matches!(ctx.check(), Err(StoreError::Canceled)));
    }

    #[test]
    fn child_cannot_loosen_deadline() {
        let now = Instant::now();
        let parent = Context::new().with_deadline(now + Duration::from_millis(50));
        let child = parent.with_deadline(now + Duration::from_secs(10));
        assert_eq!(child.deadline(), Some(now + Duration::from_millis(50)));
    }

    #[test]
    fn unrepresentable_timeout_keeps_parent_deadline() {
        let unbounded = Context::new().with_timeout(Duration::MAX);
        assert_eq!(unbounded.deadline(), None);
        assert!(unbounded.check().is_ok());

        let deadline = Instant::now() + Duration::from_secs(60);
        let parent = Context::new().with_deadline(deadline);
        assert_eq!(parent.with_timeout(Duration::MAX).deadline(), Some(deadline));

        let child = parent.with_timeout(Duration::MAX);
        parent.cancel();
        assert!(child.is_canceled());
    }

    #[test]
    fn expired_deadline_fails_check() {
        let ctx = Context::new().with_deadline(Instant::now());
        assert!(ctx.is_expired());
        assert!(matches!(ctx.check(), Err(StoreError::Canceled)));
    }
}
