//! Listener task: drains the request buffer and fans out execution units.
//!
//! One listener per queue. The drain loop receives requests in FIFO order
//! and immediately spawns an independent execution unit for each, without
//! waiting for the previous one to finish - completion order is therefore
//! unordered and completion concurrency unbounded. The loop exits naturally
//! once the request buffer disconnects (the owning queue was dropped) and
//! every buffered request has been received.

use std::sync::Arc;

use super::{Request, Shared};

/// The single background task bound to one queue.
pub(crate) struct Listener<V, R> {
    shared: Arc<Shared<V, R>>,
    requests: flume::Receiver<Request<V>>,
}

impl<V, R> Listener<V, R>
where
    V: Send + 'static,
    R: Send + 'static,
{
    pub(crate) fn new(shared: Arc<Shared<V, R>>, requests: flume::Receiver<Request<V>>) -> Self {
        Self { shared, requests }
    }

    /// Drain the request buffer until it disconnects.
    pub(crate) async fn run(self) {
        tracing::debug!("listener started");

        while let Ok(request) = self.requests.recv_async().await {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(execute(shared, request));
        }

        tracing::debug!("request buffer closed, listener drained");
    }
}

/// Execution unit: perform exactly one request and deliver its outcome.
///
/// The registry entry is removed under the registry lock *before* the
/// handler runs, and the handler is read from the slot at invocation time,
/// so a swap completed before this point is always observed. A panic inside
/// the handler kills only this task; the dropped sender wakes the caller
/// with [`CompletionError::Lost`](crate::CompletionError::Lost).
async fn execute<V, R>(shared: Arc<Shared<V, R>>, request: Request<V>)
where
    V: Send + 'static,
    R: Send + 'static,
{
    let Request { ctx, value, ticket } = request;

    let Some(tx) = shared.registry.remove(ticket) else {
        // Caller rolled the entry back, or delivery is impossible anyway.
        tracing::debug!(%ticket, "no completion entry for request, skipping");
        return;
    };

    // Pin the current handler for this invocation.
    let Some(handler) = shared.handler.get() else {
        tracing::debug!(%ticket, "no handler installed, completion dropped");
        return;
    };

    tracing::trace!(%ticket, "executing request");
    let outcome = handler.call(ctx, value).await;

    // Handler errors are delivered, never logged or escalated here.
    if tx.send(outcome).is_err() {
        tracing::trace!(%ticket, "completion receiver dropped, outcome discarded");
    }
}
