//! Completion correlation: tickets, completion handles, and the registry.
//!
//! Every accepted submission is assigned a [`Ticket`] - a monotonically
//! increasing, process-local identifier - and a fresh single-use channel.
//! The registry maps tickets to the sending half of those channels; the
//! caller keeps the receiving half wrapped in a [`Completion`]. Keying by
//! ticket rather than by the submitted value means duplicate in-flight
//! values never collide: each submission gets an independent completion.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::error::{CompletionError, TaskResult};

/// Correlation key for one in-flight submission.
///
/// Tickets are unique for the lifetime of the queue that issued them and
/// strictly increasing in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// The raw ticket number.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing tickets.
#[derive(Debug)]
pub(crate) struct TicketMint {
    next: AtomicU64,
}

impl TicketMint {
    pub(crate) fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub(crate) fn issue(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Completion handle returned to the caller for one accepted submission.
///
/// Receive the outcome with [`Completion::recv`]. Receiving is the only
/// suspension point offered to the caller, and it is entirely optional:
/// dropping the handle without receiving discards the outcome without
/// leaking anything.
///
/// If no listener is running the handle never resolves on its own - the
/// core does not fabricate or time out this wait. Apply a timeout
/// externally (`tokio::time::timeout`) if the handler may never run or
/// never return.
#[derive(Debug)]
pub struct Completion<R> {
    ticket: Ticket,
    rx: oneshot::Receiver<TaskResult<R>>,
}

impl<R> Completion<R> {
    pub(crate) fn new(ticket: Ticket, rx: oneshot::Receiver<TaskResult<R>>) -> Self {
        Self { ticket, rx }
    }

    /// The ticket identifying this submission.
    #[inline]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Wait for the outcome of this submission.
    ///
    /// Exactly one of the following is returned:
    /// - `Ok(result)` - the handler completed successfully;
    /// - `Err(CompletionError::Failed(e))` - the handler returned an error;
    /// - `Err(CompletionError::Lost)` - the outcome was dropped before
    ///   delivery (execution unit panicked, or the queue was torn down
    ///   with this request still in flight).
    pub async fn recv(self) -> Result<R, CompletionError> {
        match self.rx.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(CompletionError::Failed(err)),
            Err(_) => Err(CompletionError::Lost),
        }
    }
}

/// Registry correlating in-flight tickets to their completion senders.
///
/// The only state shared between the enqueue path and concurrent execution
/// units. Every lookup/insert/remove holds the exclusive lock; the lock is
/// never held across an `await`.
pub(crate) struct CompletionRegistry<R> {
    entries: Mutex<HashMap<Ticket, oneshot::Sender<TaskResult<R>>>>,
}

impl<R> CompletionRegistry<R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert an entry for a freshly issued ticket.
    pub(crate) fn insert(&self, ticket: Ticket, tx: oneshot::Sender<TaskResult<R>>) {
        let mut entries = self.entries.lock().expect("completion registry poisoned");
        let replaced = entries.insert(ticket, tx);
        debug_assert!(replaced.is_none(), "duplicate ticket {ticket}");
    }

    /// Remove and return the entry for `ticket`.
    ///
    /// Called by the execution unit before invoking the handler, and by the
    /// enqueue path to roll back an entry whose buffer send was rejected.
    pub(crate) fn remove(&self, ticket: Ticket) -> Option<oneshot::Sender<TaskResult<R>>> {
        let mut entries = self.entries.lock().expect("completion registry poisoned");
        entries.remove(&ticket)
    }

    /// Number of live entries (submissions accepted but not yet picked up
    /// by an execution unit).
    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("completion registry poisoned")
            .len()
    }
}
