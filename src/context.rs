//! Request context threaded through to handlers.
//!
//! A [`Context`] carries an optional cancellation signal and deadline from
//! the submitting caller to the handler. The queue core never inspects it:
//! the listener and execution units deliver it to the handler verbatim, and
//! only the handler decides whether to honor it. A handler that ignores its
//! context simply runs to completion.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use conveyor::Context;
//!
//! let ctx = Context::new().with_timeout(Duration::from_secs(5));
//!
//! // Inside a handler:
//! tokio::select! {
//!     _ = ctx.cancelled() => Err("cancelled".into()),
//!     out = do_work() => Ok(out),
//! }
//! ```

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Context passed to task handlers.
///
/// Cheap to clone; clones share the same cancellation token. Use
/// [`Context::child`] to derive a context that can be cancelled
/// independently while still observing the parent's cancellation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Cancellation signal, shared by all clones.
    cancel: CancellationToken,
    /// Optional absolute deadline.
    deadline: Option<Instant>,
}

impl Context {
    /// Create a new context with no cancellation pending and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context around an existing cancellation token.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    /// Derive a child context: cancelling the parent cancels the child,
    /// but cancelling the child leaves the parent untouched. The deadline
    /// is inherited.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Request cancellation. All clones and children observe it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The deadline, if one was set.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The underlying cancellation token.
    #[inline]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether cancellation has been requested or the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Wait until cancellation is requested or the deadline passes.
    ///
    /// Resolves immediately if either has already happened. Pends forever
    /// on a context with no deadline that is never cancelled.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_not_cancelled() {
        let ctx = Context::new();
        assert!(!ctx.is_cancelled());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_is_observed_by_clones() {
        let ctx = Context::new();
        let clone = ctx.clone();

        ctx.cancel();

        assert!(ctx.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_child_cancellation_does_not_affect_parent() {
        let parent = Context::new();
        let child = parent.child();

        child.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_parent_cancellation_propagates_to_child() {
        let parent = Context::new();
        let child = parent.child();

        parent.cancel();

        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_deadline_expiry_counts_as_cancelled() {
        tokio::time::pause();

        let ctx = Context::new().with_timeout(Duration::from_millis(50));
        assert!(!ctx.is_cancelled());

        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_on_cancel() {
        let ctx = Context::new();
        let waiter = ctx.clone();

        let handle = tokio::spawn(async move { waiter.cancelled().await });

        ctx.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_resolves_on_deadline() {
        tokio::time::pause();

        let ctx = Context::new().with_timeout(Duration::from_millis(10));
        ctx.cancelled().await;
    }
}
