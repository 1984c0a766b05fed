//! # Event structure and classification.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Events are delivered synchronously from the thread that
//! performs the transition; across threads, use `seq` to restore order.
//!
//! ## Example
//! ```rust
//! use threadvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Failed)
//!     .with_worker("sim")
//!     .with_reason("grid size mismatch");
//!
//! assert_eq!(ev.kind, EventKind::Failed);
//! assert_eq!(ev.worker.as_deref(), Some("sim"));
//! assert_eq!(ev.reason.as_deref(), Some("grid size mismatch"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::workers::Priority;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of worker lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Thread-side transitions ===
    /// The execution context is up and about to run the work body.
    ///
    /// Sets: `worker`, `at`, `seq`.
    Starting,

    /// The work body returned successfully.
    ///
    /// Sets: `worker`, `at`, `seq`.
    Stopped,

    /// The work body failed or panicked.
    ///
    /// Sets: `worker`, `reason`, `at`, `seq`.
    Failed,

    /// The work body observed a cancellation request and stopped.
    ///
    /// Sets: `worker`, `at`, `seq`.
    Canceled,

    // === Controller-side commands ===
    /// Pause gate raised; takes effect at the work body's next checkpoint.
    ///
    /// Sets: `worker`, `at`, `seq`.
    PauseRequested,

    /// Pause gate lowered; the execution context was woken.
    ///
    /// Sets: `worker`, `at`, `seq`.
    Resumed,

    /// Cancellation requested; observers already read the terminal state.
    ///
    /// Sets: `worker`, `at`, `seq`.
    CancelRequested,

    /// Priority cached and, when a context is live, applied to it.
    ///
    /// Sets: `worker`, `priority`, `at`, `seq`.
    PriorityChanged,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Starting => "worker_starting",
            EventKind::Stopped => "worker_stopped",
            EventKind::Failed => "worker_failed",
            EventKind::Canceled => "worker_canceled",
            EventKind::PauseRequested => "worker_pause_requested",
            EventKind::Resumed => "worker_resumed",
            EventKind::CancelRequested => "worker_cancel_requested",
            EventKind::PriorityChanged => "worker_priority_changed",
        }
    }
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Event classification.
    pub kind: EventKind,
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Worker name.
    pub worker: Option<Arc<str>>,
    /// Human-readable reason (failure message, panic text).
    pub reason: Option<Arc<str>>,
    /// Priority carried by [`EventKind::PriorityChanged`].
    pub priority: Option<Priority>,
}

impl Event {
    /// Creates an event of `kind`, stamping `seq` and `at`.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            worker: None,
            reason: None,
            priority: None,
        }
    }

    /// Sets the worker name.
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Sets the human-readable reason.
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the carried priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::Starting);
        let b = Event::new(EventKind::Stopped);
        assert!(b.seq > a.seq, "sequence numbers must increase");
    }

    #[test]
    fn test_builders_set_metadata() {
        let ev = Event::new(EventKind::PriorityChanged)
            .with_worker("w")
            .with_priority(Priority::High);
        assert_eq!(ev.worker.as_deref(), Some("w"));
        assert_eq!(ev.priority, Some(Priority::High));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(EventKind::Starting.as_label(), "worker_starting");
        assert_eq!(
            EventKind::CancelRequested.as_label(),
            "worker_cancel_requested"
        );
    }
}
