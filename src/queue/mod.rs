//! Queue module - bounded submission, completion correlation, dispatch.
//!
//! Provides:
//! - [`Queue`] - accepts bounded, non-blocking submissions and dispatches
//!   them to the current handler through its listener.
//! - [`Completion`] / [`Ticket`] - the per-submission completion handle and
//!   its correlation key.
//!
//! # Example
//!
//! ```ignore
//! use conveyor::{Context, Queue, TaskResult};
//!
//! let queue: Queue<u32, u32> = Queue::new(
//!     |_ctx: Context, n: u32| async move { Ok(n * 2) },
//!     16,
//! );
//! queue.start_listener();
//!
//! let completion = queue.enqueue(Context::new(), 21)?;
//! assert_eq!(completion.recv().await?, 42);
//! ```

pub(crate) mod completion;
mod listener;

pub use completion::{Completion, Ticket};

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::context::Context;
use crate::error::{EnqueueError, TaskResult};
use crate::handler::{FnHandler, Handler, HandlerSlot};
use completion::{CompletionRegistry, TicketMint};
use listener::Listener;

/// Request envelope: created at enqueue time, consumed by the listener.
pub(crate) struct Request<V> {
    pub(crate) ctx: Context,
    pub(crate) value: V,
    pub(crate) ticket: Ticket,
}

/// State shared between the enqueue path, the listener, and every
/// execution unit it spawns.
pub(crate) struct Shared<V, R> {
    pub(crate) registry: CompletionRegistry<R>,
    pub(crate) handler: HandlerSlot<V, R>,
}

/// A bounded task queue with per-submission completion handles.
///
/// Submissions never block: [`Queue::enqueue`] either hands back a
/// [`Completion`] immediately or rejects with the back-pressure signal
/// [`EnqueueError::Full`]. A single listener (started once with
/// [`Queue::start_listener`]) drains the buffer in FIFO order and runs
/// each request as an independent concurrent task, so completions may
/// arrive in any order.
///
/// The active handler can be swapped at runtime ([`Queue::use_handler`],
/// [`Queue::use_default`]) without restarting the listener - chiefly to
/// substitute a test double. Requests already past their invocation point
/// keep the handler they pinned.
///
/// Dropping the queue closes the request buffer; the listener drains what
/// was already accepted and exits.
pub struct Queue<V, R = ()> {
    shared: Arc<Shared<V, R>>,
    requests: flume::Sender<Request<V>>,
    /// Receiver handed to the listener exactly once.
    listener_rx: Mutex<Option<flume::Receiver<Request<V>>>>,
    tickets: TicketMint,
    capacity: usize,
}

impl<V, R> Queue<V, R>
where
    V: Send + 'static,
    R: Send + 'static,
{
    /// Create a queue with the given handler (installed as both default
    /// and current) and a request buffer of the given capacity.
    ///
    /// `capacity = 0` yields a rendezvous queue: a submission succeeds
    /// only while the listener is actively receiving at that instant.
    pub fn new<F, Fut>(handler: F, capacity: usize) -> Self
    where
        F: Fn(Context, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<R>> + Send + 'static,
    {
        Self::with_handler(Arc::new(FnHandler::new(handler)), capacity)
    }

    /// Create a rendezvous (zero-capacity) queue.
    pub fn unbuffered<F, Fut>(handler: F) -> Self
    where
        F: Fn(Context, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<R>> + Send + 'static,
    {
        Self::new(handler, 0)
    }

    /// Create a queue from an already-built handler (for stateful handlers
    /// implementing [`Handler`] directly).
    pub fn with_handler(handler: Arc<dyn Handler<V, R>>, capacity: usize) -> Self {
        let (tx, rx) = flume::bounded(capacity);
        Self {
            shared: Arc::new(Shared {
                registry: CompletionRegistry::new(),
                handler: HandlerSlot::new(handler),
            }),
            requests: tx,
            listener_rx: Mutex::new(Some(rx)),
            tickets: TicketMint::new(),
            capacity,
        }
    }

    /// Submit a value for processing.
    ///
    /// Never blocks. On acceptance, returns the [`Completion`] that will
    /// carry this submission's outcome. On rejection, returns the
    /// back-pressure signal:
    /// - [`EnqueueError::Full`] - the buffer is full, or (capacity 0) no
    ///   listener was actively receiving;
    /// - [`EnqueueError::Closed`] - the listener has terminated.
    ///
    /// No registry entry survives a rejected submission.
    pub fn enqueue(&self, ctx: Context, value: V) -> Result<Completion<R>, EnqueueError> {
        let ticket = self.tickets.issue();
        let (tx, rx) = oneshot::channel();

        // Entry goes in before the buffer send so an execution unit can
        // never dequeue a request whose entry does not exist yet.
        self.shared.registry.insert(ticket, tx);

        match self.requests.try_send(Request { ctx, value, ticket }) {
            Ok(()) => {
                tracing::trace!(%ticket, "request accepted");
                Ok(Completion::new(ticket, rx))
            }
            Err(flume::TrySendError::Full(_)) => {
                self.shared.registry.remove(ticket);
                Err(EnqueueError::Full)
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                self.shared.registry.remove(ticket);
                Err(EnqueueError::Closed)
            }
        }
    }

    /// Start the listener for this queue.
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// resolves once the queue is dropped and the listener has drained
    /// the remaining buffered requests.
    ///
    /// # Panics
    ///
    /// Panics if called a second time. Two listeners racing over the same
    /// registry would double-process requests; this is a programming
    /// error, surfaced immediately rather than recovered from.
    pub fn start_listener(&self) -> JoinHandle<()> {
        let rx = self
            .listener_rx
            .lock()
            .expect("listener slot poisoned")
            .take()
            .expect("listener already started");

        let listener = Listener::new(Arc::clone(&self.shared), rx);
        tokio::spawn(listener.run())
    }

    /// Replace the current handler.
    ///
    /// Takes effect for every request that reaches its invocation point
    /// after this call returns; requests already past it keep the handler
    /// they pinned. The listener keeps running undisturbed.
    pub fn use_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(Context, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult<R>> + Send + 'static,
    {
        self.shared
            .handler
            .replace(Arc::new(FnHandler::new(handler)));
    }

    /// Restore the handler supplied at construction.
    pub fn use_default(&self) {
        self.shared.handler.restore_default();
    }

    /// Capacity of the request buffer (0 = rendezvous).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of submissions accepted but not yet picked up by an
    /// execution unit.
    pub fn in_flight(&self) -> usize {
        self.shared.registry.len()
    }
}
