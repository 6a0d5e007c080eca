use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use uuid::Uuid;

/// A listener failed while handling a failure report. Local to that listener;
/// fan-out to the remaining listeners continues.
#[derive(Debug, Error)]
#[error("failure report not delivered: {reason}")]
pub struct ReportError {
    reason: String,
}

impl ReportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Handle returned by `register`, used to unregister later.
pub type ListenerId = Uuid;

/// Notified once per failed probe.
pub trait FailureListener: Send + Sync {
    fn on_failure(&self) -> Result<(), ReportError>;
}

/// Insertion-ordered listener set, mutable while a fan-out is in flight.
/// Fan-out iterates a snapshot, so concurrent register/unregister calls never
/// observe a partially notified set and never deadlock against it.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Mutex<Vec<(ListenerId, Arc<dyn FailureListener>)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn FailureListener>) -> ListenerId {
        let id = Uuid::new_v4();
        self.lock().push((id, listener));
        tracing::debug!(listener = %id, "failure listener registered");
        id
    }

    /// Remove a listener. Returns false if the id was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(lid, _)| *lid != id);
        before != entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Fan a probe failure out to every listener, in registration order. A
    /// listener's own error is logged and does not suppress the rest.
    pub fn notify_failure(&self) {
        let snapshot: Vec<_> = self.lock().clone();
        for (id, listener) in snapshot {
            if let Err(e) = listener.on_failure() {
                tracing::warn!(listener = %id, error = %e, "failure listener errored, continuing fan-out");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(ListenerId, Arc<dyn FailureListener>)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
