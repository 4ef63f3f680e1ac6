//! Handler trait and the closure adapter.
//!
//! Value-only handlers (`(ctx, value) -> Result<(), _>`) are the `R = ()`
//! instantiation of the same generic trait; value+result handlers are any
//! other `R`. One generic implementation covers both.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use crate::context::Context;
use crate::error::TaskResult;

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for task handler functions.
///
/// Implemented for any `Fn(Context, V) -> impl Future<Output = TaskResult<R>>`
/// via [`FnHandler`]; implement it directly for stateful handlers.
pub trait Handler<V, R>: Send + Sync + 'static {
    /// Handle one request.
    fn call(&self, ctx: Context, value: V) -> BoxFuture<'static, TaskResult<R>>;
}

/// Wrapper that adapts a plain async closure into a [`Handler`].
pub struct FnHandler<F, V, Fut> {
    handler: F,
    _phantom: PhantomData<fn(V) -> Fut>,
}

impl<F, V, R, Fut> FnHandler<F, V, Fut>
where
    F: Fn(Context, V) -> Fut + Send + Sync + 'static,
    V: Send + 'static,
    R: Send + 'static,
    Fut: Future<Output = TaskResult<R>> + Send + 'static,
{
    /// Create a new function handler.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, V, R, Fut> Handler<V, R> for FnHandler<F, V, Fut>
where
    F: Fn(Context, V) -> Fut + Send + Sync + 'static,
    V: Send + 'static,
    R: Send + 'static,
    Fut: Future<Output = TaskResult<R>> + Send + 'static,
{
    fn call(&self, ctx: Context, value: V) -> BoxFuture<'static, TaskResult<R>> {
        Box::pin((self.handler)(ctx, value))
    }
}
