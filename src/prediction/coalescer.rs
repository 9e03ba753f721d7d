//! Debounced, cancellable prediction requests.
//!
//! # Architecture
//!
//! ```text
//! schedule(state)
//!       │
//!       ├─► Cancel previous request (if any)
//!       │
//!       └─► Spawn request task
//!               │
//!               ├─► Wait debounce duration (aborts early on cancel)
//!               │
//!               ├─► predictor.predict(state, token)
//!               │
//!               └─► Send PredictionEvent (unless cancelled)
//! ```
//!
//! Only the most recently scheduled request can deliver a result.
//! Cancellation is cooperative: the token is passed down to the predictor
//! and its transport. A cancelled request produces no event at all.
//!
//! The coalescer does not enforce timeouts; those belong to the transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::predictor::{EditorState, Prediction, Predictor};
use crate::error::{LockResultExt, PredictionError};

/// Default debounce duration between the last edit and the model call.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Logging target for the coalescer.
const LOG_TARGET: &str = "ghost_edit::coalescer";

/// Outcome of a request that was not superseded.
#[derive(Debug)]
pub enum PredictionEvent {
    /// The predictor produced a result.
    ///
    /// The prediction carries the document version it was computed for;
    /// callers must still compare it with their current version.
    Ready(Prediction),
    /// The predictor failed with a non-cancellation error.
    Failed {
        version: u64,
        error: PredictionError,
    },
}

/// The request that is allowed to deliver a result.
struct PendingRequest {
    id: u64,
    token: CancellationToken,
}

/// Debounces predictor calls and cancels superseded ones.
///
/// `schedule` spawns onto the ambient tokio runtime and must be called
/// from within one.
pub struct RequestCoalescer<P> {
    predictor: Arc<P>,
    debounce: Duration,
    events: UnboundedSender<PredictionEvent>,
    current: Arc<Mutex<Option<PendingRequest>>>,
    next_id: AtomicU64,
}

impl<P: Predictor> RequestCoalescer<P> {
    /// Create a coalescer delivering outcomes on `events`.
    pub fn new(
        predictor: Arc<P>,
        debounce: Duration,
        events: UnboundedSender<PredictionEvent>,
    ) -> Self {
        Self {
            predictor,
            debounce,
            events,
            current: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Schedule a prediction for `state`, superseding any pending one.
    ///
    /// Returns the request id.
    pub fn schedule(&self, state: EditorState) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();

        let previous = self
            .current
            .lock()
            .recover_poison("RequestCoalescer::schedule")
            .replace(PendingRequest {
                id,
                token: token.clone(),
            });
        if let Some(previous) = previous {
            previous.token.cancel();
            log::trace!(
                target: LOG_TARGET,
                "Request {} superseded by {}",
                previous.id,
                id
            );
        }

        let predictor = Arc::clone(&self.predictor);
        let events = self.events.clone();
        let current = Arc::clone(&self.current);
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    log::trace!(target: LOG_TARGET, "Request {} cancelled during debounce", id);
                    return;
                }
                _ = tokio::time::sleep(debounce) => {}
            }

            log::debug!(
                target: LOG_TARGET,
                "Debounce expired for request {} (version {})",
                id,
                state.version
            );

            let result = predictor.predict(&state, &token).await;
            finish(&current, id);

            if token.is_cancelled() {
                log::debug!(target: LOG_TARGET, "Dropping result of cancelled request {}", id);
                return;
            }

            match result {
                Ok(prediction) => {
                    let _ = events.send(PredictionEvent::Ready(prediction));
                }
                Err(error) if error.is_cancelled() => {
                    log::debug!(target: LOG_TARGET, "Request {} cancelled by predictor", id);
                }
                Err(error) => {
                    log::warn!(
                        target: LOG_TARGET,
                        "Prediction request {} failed: {}",
                        id,
                        error
                    );
                    let _ = events.send(PredictionEvent::Failed {
                        version: state.version,
                        error,
                    });
                }
            }
        });

        id
    }

    /// Cancel the pending request, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self
            .current
            .lock()
            .recover_poison("RequestCoalescer::cancel")
            .take()
        {
            previous.token.cancel();
            log::trace!(target: LOG_TARGET, "Cancelled request {}", previous.id);
        }
    }

    /// Whether a scheduled request has not finished yet.
    pub fn has_pending(&self) -> bool {
        self.current
            .lock()
            .recover_poison("RequestCoalescer::has_pending")
            .is_some()
    }
}

impl<P> Drop for RequestCoalescer<P> {
    fn drop(&mut self) {
        if let Some(pending) = self
            .current
            .lock()
            .recover_poison("RequestCoalescer::drop")
            .take()
        {
            pending.token.cancel();
        }
    }
}

/// Clear the pending slot if it still belongs to request `id`.
fn finish(current: &Mutex<Option<PendingRequest>>, id: u64) {
    let mut current = current.lock().recover_poison("RequestCoalescer::finish");
    if current.as_ref().is_some_and(|pending| pending.id == id) {
        *current = None;
    }
}
