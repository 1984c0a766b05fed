//! Error types used by the threadvisor control surface and work bodies.
//!
//! This module defines three main error enums:
//!
//! - [`ControlError`] — contract violations and platform failures raised by
//!   [`Worker`](crate::Worker) commands.
//! - [`WorkError`] — errors raised by a work body itself (including observing
//!   a cancellation request at a checkpoint).
//! - [`LockError`] — misuse or owner-death conditions of [`ExclusiveLock`](crate::ExclusiveLock).
//!
//! All types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. Every error is reported synchronously to the caller of
//! the triggering operation; the one exception is worker teardown, where
//! errors are absorbed and logged because no caller remains to receive them.

use thiserror::Error;

use crate::workers::Priority;

/// # Errors produced by worker control commands.
///
/// These represent programming-contract violations (commanding a worker in
/// the wrong lifecycle state) or platform resource failures. None of them
/// are transient: there is nothing to retry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ControlError {
    /// `run` was called with no work bound to the worker.
    #[error("worker `{worker}` has no work bound")]
    Unbound {
        /// Worker name.
        worker: String,
    },

    /// `bind` was called while a previous execution context is still live.
    #[error("worker `{worker}` is still bound to a live execution context")]
    Rebind {
        /// Worker name.
        worker: String,
    },

    /// `pause`, `resume`, `cancel`, or a live-priority change was requested
    /// with no running execution context.
    #[error("worker `{worker}` has no running execution context")]
    NotRunning {
        /// Worker name.
        worker: String,
    },

    /// `join` was called with no execution context to join.
    #[error("worker `{worker}` has no execution context to join")]
    NoActiveContext {
        /// Worker name.
        worker: String,
    },

    /// `join` was called while the worker is paused.
    ///
    /// A paused worker never reaches the checkpoint that would let it finish,
    /// so the join would block forever. Callers must `resume` first.
    #[error("worker `{worker}` is paused; resume it before joining")]
    JoinWhilePaused {
        /// Worker name.
        worker: String,
    },

    /// The platform scheduler refused to change the live thread's priority.
    ///
    /// Raising priority above `Normal` typically requires elevated
    /// privileges; the cached priority is still updated.
    #[error("failed to apply priority {priority:?} to worker `{worker}` (errno {errno})")]
    PriorityChangeFailed {
        /// Worker name.
        worker: String,
        /// The priority that was requested.
        priority: Priority,
        /// Raw OS error code.
        errno: i32,
    },

    /// The platform refused to start a new execution context.
    #[error("failed to start execution context for worker `{worker}`: {source}")]
    ThreadCreationFailed {
        /// Worker name.
        worker: String,
        /// Underlying spawn failure.
        #[source]
        source: std::io::Error,
    },
}

impl ControlError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use threadvisor::ControlError;
    ///
    /// let err = ControlError::Unbound { worker: "demo".into() };
    /// assert_eq!(err.as_label(), "control_unbound");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ControlError::Unbound { .. } => "control_unbound",
            ControlError::Rebind { .. } => "control_rebind",
            ControlError::NotRunning { .. } => "control_not_running",
            ControlError::NoActiveContext { .. } => "control_no_active_context",
            ControlError::JoinWhilePaused { .. } => "control_join_while_paused",
            ControlError::PriorityChangeFailed { .. } => "control_priority_change_failed",
            ControlError::ThreadCreationFailed { .. } => "control_thread_creation_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ControlError::Unbound { worker } => format!("no work bound: worker={worker}"),
            ControlError::Rebind { worker } => {
                format!("live context, cannot rebind: worker={worker}")
            }
            ControlError::NotRunning { worker } => format!("not running: worker={worker}"),
            ControlError::NoActiveContext { worker } => format!("nothing to join: worker={worker}"),
            ControlError::JoinWhilePaused { worker } => {
                format!("paused, join refused: worker={worker}")
            }
            ControlError::PriorityChangeFailed {
                worker,
                priority,
                errno,
            } => {
                format!("priority change refused: worker={worker} priority={priority:?} errno={errno}")
            }
            ControlError::ThreadCreationFailed { worker, source } => {
                format!("spawn failed: worker={worker} error={source}")
            }
        }
    }

    /// Worker name the error refers to.
    pub fn worker(&self) -> &str {
        match self {
            ControlError::Unbound { worker }
            | ControlError::Rebind { worker }
            | ControlError::NotRunning { worker }
            | ControlError::NoActiveContext { worker }
            | ControlError::JoinWhilePaused { worker }
            | ControlError::PriorityChangeFailed { worker, .. }
            | ControlError::ThreadCreationFailed { worker, .. } => worker,
        }
    }
}

/// # Errors produced by a work body.
///
/// A work body returns `Result<(), WorkError>`. Observing a cancellation
/// request at a [`checkpoint`](crate::ControlToken::checkpoint) surfaces as
/// [`WorkError::Canceled`]; domain failures surface as [`WorkError::Failed`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    /// The work observed a cancellation request and stopped cooperatively.
    #[error("work canceled at checkpoint")]
    Canceled,

    /// The work failed on its own terms.
    #[error("work failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl WorkError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Canceled => "work_canceled",
            WorkError::Failed { .. } => "work_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkError::Canceled => "canceled".to_string(),
            WorkError::Failed { error } => format!("error: {error}"),
        }
    }
}

impl From<LockError> for WorkError {
    /// Lock failures inside a work body surface as work failures; the lock
    /// label is preserved in the message.
    fn from(e: LockError) -> Self {
        WorkError::Failed {
            error: e.as_message(),
        }
    }
}

/// # Errors produced by [`ExclusiveLock`](crate::ExclusiveLock).
///
/// `Abandoned` is the owner-death signal: the previous holder's thread
/// panicked while holding the lock. It is surfaced exactly once; the next
/// `acquire` proceeds normally.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// The underlying platform primitive is unusable (poisoned bookkeeping).
    #[error("lock acquire failed: underlying primitive unusable")]
    AcquireFailed,

    /// `release` was called by a thread that does not hold the lock.
    #[error("lock released by a thread that does not hold it")]
    ReleaseFailed,

    /// The previous holder terminated without releasing.
    ///
    /// Surfaced to the next acquirer instead of deadlocking forever; check
    /// the protected state for partial writes before retrying.
    #[error("previous holder abandoned the lock without releasing")]
    Abandoned,
}

impl LockError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use threadvisor::LockError;
    ///
    /// assert_eq!(LockError::Abandoned.as_label(), "lock_abandoned");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LockError::AcquireFailed => "lock_acquire_failed",
            LockError::ReleaseFailed => "lock_release_failed",
            LockError::Abandoned => "lock_abandoned",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LockError::AcquireFailed => "acquire failed: primitive unusable".to_string(),
            LockError::ReleaseFailed => "release failed: undefined owner".to_string(),
            LockError::Abandoned => "abandoned by previous holder".to_string(),
        }
    }
}
