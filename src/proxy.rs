//! Proxy - the non-queued, synchronous call-through variant.
//!
//! A [`Proxy`] wraps a handler behind the same substitution contract as
//! [`Queue`](crate::Queue) (`use_handler` / `use_default`) but with no
//! buffer, no registry, and no listener: [`Proxy::call_with`] invokes the
//! current handler and returns its outcome directly. Useful as a light
//! indirection seam, for example to substitute a test double in code that
//! does not need queuing.
//!
//! # Example
//!
//! ```ignore
//! use conveyor::{Context, Proxy, TaskResult};
//!
//! let proxy: Proxy<i32, i32> = Proxy::new(|_ctx, n| async move { Ok(n + 1) });
//! assert_eq!(proxy.call_with(Context::new(), 1).await?, 2);
//!
//! proxy.use_handler(|_ctx, n| async move { Ok(n - 1) });
//! assert_eq!(proxy.call_with(Context::new(), 1).await?, 0);
//!
//! proxy.use_default();
//! assert_eq!(proxy.call_with(Context::new(), 1).await?, 2);
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::context::Context;
use crate::error::TaskResult;
use crate::handler::{FnHandler, Handler, HandlerSlot};

/// Direct call-through wrapper over a swappable handler.
pub struct Proxy<V, R = ()> {
    slot: HandlerSlot<V, R>,
}

impl<V, R> Proxy<V, R>
where
    V: Send + 'static,
    R: Send + 'static,
{
    /// Create a proxy with the given handler as both default and current.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Context, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<R>> + Send + 'static,
    {
        Self::with_handler(Arc::new(FnHandler::new(handler)))
    }

    /// Create a proxy from an already-built handler.
    pub fn with_handler(handler: Arc<dyn Handler<V, R>>) -> Self {
        Self {
            slot: HandlerSlot::new(handler),
        }
    }

    /// Create a proxy with no default and no current handler.
    ///
    /// A handler must be installed with [`Proxy::use_handler`] before the
    /// first call; [`Proxy::use_default`] is never valid on this proxy.
    pub fn without_default() -> Self {
        Self {
            slot: HandlerSlot::empty(),
        }
    }

    /// Invoke the current handler and return its outcome directly.
    ///
    /// # Panics
    ///
    /// Panics if no handler is installed (a proxy built with
    /// [`Proxy::without_default`] before any `use_handler` call).
    pub async fn call_with(&self, ctx: Context, value: V) -> TaskResult<R> {
        let handler = self.slot.get().expect("proxy has no handler installed");
        handler.call(ctx, value).await
    }

    /// Replace the current handler.
    pub fn use_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(Context, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<R>> + Send + 'static,
    {
        self.slot.replace(Arc::new(FnHandler::new(handler)));
    }

    /// Restore the handler supplied at construction.
    ///
    /// # Panics
    ///
    /// Panics if the proxy was built with [`Proxy::without_default`] -
    /// there is nothing to restore.
    pub fn use_default(&self) {
        self.slot.restore_default();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;
    use crate::error::BoxError;

    #[tokio::test]
    async fn test_call_with_returns_handler_outcome() {
        let proxy: Proxy<i32, i32> =
            Proxy::new(|_ctx: Context, n: i32| async move { Ok::<_, BoxError>(n * 3) });

        assert_eq!(proxy.call_with(Context::new(), 5).await.unwrap(), 15);
    }

    #[tokio::test]
    async fn test_handler_substitution_sequence() {
        // Counter scenario: default adds the value, substitute subtracts.
        let counter = Arc::new(AtomicI64::new(99));

        let c = Arc::clone(&counter);
        let proxy: Proxy<i64, i64> = Proxy::new(move |_ctx: Context, n: i64| {
            let c = Arc::clone(&c);
            async move { Ok::<_, BoxError>(c.fetch_add(n, Ordering::SeqCst) + n) }
        });

        assert_eq!(proxy.call_with(Context::new(), 1).await.unwrap(), 100);
        assert_eq!(counter.load(Ordering::SeqCst), 100);

        let other = Arc::new(AtomicI64::new(0));
        let o = Arc::clone(&other);
        proxy.use_handler(move |_ctx: Context, n: i64| {
            let o = Arc::clone(&o);
            async move { Ok::<_, BoxError>(o.fetch_add(n, Ordering::SeqCst) + n) }
        });

        assert_eq!(proxy.call_with(Context::new(), 1).await.unwrap(), 1);
        assert_eq!(other.load(Ordering::SeqCst), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 100);

        proxy.use_default();
        assert_eq!(proxy.call_with(Context::new(), -1).await.unwrap(), 99);
        assert_eq!(counter.load(Ordering::SeqCst), 99);
    }

    #[tokio::test]
    async fn test_error_passes_through() {
        let proxy: Proxy<i32, i32> =
            Proxy::new(|_ctx: Context, _n: i32| async move { Err("rejected".into()) });

        let err = proxy.call_with(Context::new(), 1).await.unwrap_err();
        assert_eq!(err.to_string(), "rejected");
    }

    #[tokio::test]
    async fn test_without_default_then_use_handler() {
        let proxy: Proxy<i32, i32> = Proxy::without_default();
        proxy.use_handler(|_ctx: Context, n: i32| async move { Ok::<_, BoxError>(n) });

        assert_eq!(proxy.call_with(Context::new(), 8).await.unwrap(), 8);
    }

    #[test]
    #[should_panic(expected = "no default handler to restore")]
    fn test_use_default_without_default_panics() {
        let proxy: Proxy<i32, i32> = Proxy::without_default();
        proxy.use_default();
    }

    #[tokio::test]
    #[should_panic(expected = "proxy has no handler installed")]
    async fn test_call_with_no_handler_panics() {
        let proxy: Proxy<i32, i32> = Proxy::without_default();
        let _ = proxy.call_with(Context::new(), 1).await;
    }
}
