//! Error types for conveyor.

use thiserror::Error;

/// Boxed error type returned by handlers.
///
/// Handlers surface arbitrary application errors; the core never inspects
/// them beyond delivering them to the one caller holding the matching
/// completion handle.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for handler invocations.
pub type TaskResult<R> = Result<R, BoxError>;

/// Error returned when a submission is not accepted into the queue.
///
/// This is the explicit back-pressure signal: the caller must decide to
/// retry later, drop the item, or apply its own queuing policy. The core
/// never blocks waiting for a free slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnqueueError {
    /// The request buffer is full (or, for a zero-capacity queue, no
    /// listener was actively receiving at the instant of submission).
    #[error("request buffer is full")]
    Full,

    /// The listener has terminated and the request buffer is disconnected.
    #[error("queue is closed")]
    Closed,
}

/// Error returned when awaiting a completion handle.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The handler ran and returned an error. Delivered solely to the
    /// caller holding this completion handle; never logged or escalated.
    #[error("handler failed: {0}")]
    Failed(#[source] BoxError),

    /// The completion sender was dropped before an outcome was delivered.
    ///
    /// This happens when the execution unit panicked inside the handler,
    /// or when the queue was torn down with the request still in flight.
    #[error("completion was lost before an outcome was delivered")]
    Lost,
}

impl CompletionError {
    /// Returns `true` if the handler ran and failed (as opposed to the
    /// outcome being lost).
    pub fn is_failed(&self) -> bool {
        matches!(self, CompletionError::Failed(_))
    }

    /// Returns `true` if the outcome was lost without the handler's
    /// result being delivered.
    pub fn is_lost(&self) -> bool {
        matches!(self, CompletionError::Lost)
    }
}
