//! # conveyor
//!
//! In-process asynchronous task queue with per-submission completion
//! handles.
//!
//! Callers submit a value to be processed by a registered handler and get
//! back a private [`Completion`] that eventually carries that submission's
//! outcome. Submitting work is decoupled from performing it: one background
//! listener drains a bounded buffer and fans requests out to concurrent
//! executions, while each caller keeps an unambiguous way to learn when
//! *their* request finished.
//!
//! ## Architecture
//!
//! ```text
//! caller ─ enqueue(ctx, v) ─► bounded buffer ─► Listener ─┬─► execution unit ─► handler
//!    │                                                    ├─► execution unit ─► handler
//!    ◄─────── Completion::recv() ◄── registry entry ◄─────┴─ ...
//! ```
//!
//! - `enqueue` never blocks: it accepts immediately or rejects with the
//!   back-pressure signal [`EnqueueError::Full`].
//! - Requests dequeue in FIFO order but complete in any order; each runs
//!   as an independent task.
//! - The active handler can be swapped at runtime without restarting the
//!   listener ([`Queue::use_handler`] / [`Queue::use_default`]).
//! - [`Proxy`] offers the same substitution contract as a plain synchronous
//!   call-through, with no buffering.
//!
//! ## Example
//!
//! ```ignore
//! use conveyor::{Context, Queue};
//!
//! #[tokio::main]
//! async fn main() {
//!     let queue: Queue<u32, u32> = Queue::new(
//!         |_ctx, n: u32| async move { Ok(n * 2) },
//!         16,
//!     );
//!     queue.start_listener();
//!
//!     let completion = queue.enqueue(Context::new(), 21).unwrap();
//!     assert_eq!(completion.recv().await.unwrap(), 42);
//! }
//! ```

pub mod context;
pub mod error;
pub mod handler;
pub mod queue;

mod proxy;

pub use context::Context;
pub use error::{BoxError, CompletionError, EnqueueError, TaskResult};
pub use handler::{BoxFuture, FnHandler, Handler};
pub use proxy::Proxy;
pub use queue::{Completion, Queue, Ticket};
