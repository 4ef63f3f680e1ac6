//! Handler module - the function contract invoked for every request.
//!
//! Provides:
//! - [`Handler`] - the trait invoked by execution units and the proxy:
//!   `(Context, V) -> TaskResult<R>`.
//! - [`FnHandler`] - adapter wrapping plain closures / `async fn`s into
//!   [`Handler`], so constructors and `use_handler` accept them directly.
//! - `HandlerSlot` - the single mutable slot holding the currently active
//!   handler, shared by [`Queue`](crate::Queue) and [`Proxy`](crate::Proxy).
//!
//! # Example
//!
//! ```ignore
//! use conveyor::{Context, Queue, TaskResult};
//!
//! async fn double(_ctx: Context, n: i64) -> TaskResult<i64> {
//!     Ok(n * 2)
//! }
//!
//! let queue: Queue<i64, i64> = Queue::new(double, 16);
//! ```

mod func;
mod slot;

pub use func::{BoxFuture, FnHandler, Handler};
pub(crate) use slot::HandlerSlot;
