//! # Cooperative control plane shared between a worker and its thread.
//!
//! [`ControlState`] is the crate-internal block of flags and the pause gate;
//! [`ControlToken`] is the public view handed to work bodies.
//!
//! ## Control flow
//! ```text
//! controller thread                      worker thread
//! ─────────────────                      ─────────────
//! pause()   ──► gate.paused = true       checkpoint():
//! resume()  ──► gate.paused = false  ──►   wait while paused && !cancelled
//! cancel()  ──► gate.cancelled = true ─►   Err(WorkError::Canceled) if cancelled
//! ```
//!
//! The observer flags (`running`, `paused`, `finished`) are plain relaxed
//! atomics: they are polled by the controller every frame and are not used
//! for synchronization. The gate itself is a `Mutex<Gate>` + `Condvar`, the
//! only blocking structure in the control plane.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::error::WorkError;
use crate::workers::worker::Outcome;

/// Pause/cancel gate observed at work checkpoints.
#[derive(Default)]
struct Gate {
    paused: bool,
    cancelled: bool,
}

/// Shared control block for one worker slot.
///
/// One `ControlState` lives as long as its [`Worker`](crate::Worker); each
/// `run` resets it for the new execution context.
pub(crate) struct ControlState {
    gate: Mutex<Gate>,
    unpaused: Condvar,

    running: AtomicBool,
    paused: AtomicBool,
    finished: AtomicBool,

    /// Native thread id recorded by the execution context (0 = unknown).
    native_id: AtomicI64,

    outcome: Mutex<Option<Outcome>>,
}

impl ControlState {
    pub(crate) fn new() -> Self {
        Self {
            gate: Mutex::new(Gate::default()),
            unpaused: Condvar::new(),
            running: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            native_id: AtomicI64::new(0),
            outcome: Mutex::new(None),
        }
    }

    // Gate sections contain no user code, so a poisoned gate still holds
    // valid flags; recover the inner state instead of failing the command.
    fn gate(&self) -> std::sync::MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prepares the control block for a fresh execution context.
    pub(crate) fn reset_for_run(&self) {
        let mut gate = self.gate();
        gate.paused = false;
        gate.cancelled = false;
        drop(gate);

        self.paused.store(false, Ordering::Relaxed);
        self.finished.store(false, Ordering::Relaxed);
        self.running.store(true, Ordering::Relaxed);
        self.native_id.store(0, Ordering::Relaxed);
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Rolls back [`reset_for_run`](Self::reset_for_run) when spawn fails.
    pub(crate) fn mark_spawn_failed(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub(crate) fn request_pause(&self) {
        self.gate().paused = true;
        self.paused.store(true, Ordering::Relaxed);
    }

    pub(crate) fn request_resume(&self) {
        self.gate().paused = false;
        self.paused.store(false, Ordering::Relaxed);
        self.unpaused.notify_all();
    }

    /// Requests cancellation and flips the observer flags to their terminal
    /// state. The execution context unwinds at its next checkpoint.
    pub(crate) fn request_cancel(&self) {
        let mut gate = self.gate();
        gate.cancelled = true;
        gate.paused = false;
        drop(gate);
        self.unpaused.notify_all();

        self.running.store(false, Ordering::Relaxed);
        self.paused.store(false, Ordering::Relaxed);
        self.finished.store(true, Ordering::Relaxed);
    }

    /// Terminal bookkeeping run by the execution context's epilogue.
    pub(crate) fn finish(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        self.running.store(false, Ordering::Relaxed);
        self.paused.store(false, Ordering::Relaxed);
        self.finished.store(true, Ordering::Relaxed);
    }

    pub(crate) fn record_native_id(&self, id: i64) {
        self.native_id.store(id, Ordering::Relaxed);
    }

    pub(crate) fn native_id(&self) -> i64 {
        self.native_id.load(Ordering::Relaxed)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    pub(crate) fn outcome(&self) -> Option<Outcome> {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// # Cooperative control handle passed into a work body.
///
/// The token is the work body's side of the pause/cancel contract:
/// [`checkpoint`](ControlToken::checkpoint) blocks while the worker is paused
/// and reports a pending cancellation request, so a `?` on it is all a loop
/// body needs.
///
/// # Example
/// ```
/// use threadvisor::{ControlToken, WorkError};
///
/// fn step(ctx: &ControlToken, n: u32) -> Result<u32, WorkError> {
///     let mut acc = 0;
///     for i in 0..n {
///         ctx.checkpoint()?;
///         acc += i;
///     }
///     Ok(acc)
/// }
/// ```
#[derive(Clone)]
pub struct ControlToken {
    state: Arc<ControlState>,
}

impl ControlToken {
    pub(crate) fn new(state: Arc<ControlState>) -> Self {
        Self { state }
    }

    /// Blocks while the worker is paused; reports a pending cancel request.
    ///
    /// Returns `Err(WorkError::Canceled)` once cancellation has been
    /// requested. Call between bounded steps of computation; never call while
    /// holding an [`ExclusiveLock`](crate::ExclusiveLock) guard, or a pause
    /// will stall every other party contending for that lock.
    pub fn checkpoint(&self) -> Result<(), WorkError> {
        let mut gate = self.state.gate();
        while gate.paused && !gate.cancelled {
            gate = self
                .state
                .unpaused
                .wait(gate)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if gate.cancelled {
            return Err(WorkError::Canceled);
        }
        Ok(())
    }

    /// Non-blocking probe: has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.state.gate().cancelled
    }

    /// Non-blocking probe: is the pause gate raised?
    ///
    /// A raised gate only takes effect at the next [`checkpoint`](Self::checkpoint).
    pub fn is_paused(&self) -> bool {
        self.state.gate().paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_checkpoint_passes_when_idle() {
        let state = Arc::new(ControlState::new());
        let token = ControlToken::new(state);
        assert!(token.checkpoint().is_ok());
    }

    #[test]
    fn test_checkpoint_reports_cancel() {
        let state = Arc::new(ControlState::new());
        let token = ControlToken::new(Arc::clone(&state));
        state.request_cancel();
        assert_eq!(token.checkpoint(), Err(WorkError::Canceled));
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancel_releases_paused_checkpoint() {
        let state = Arc::new(ControlState::new());
        state.request_pause();

        let token = ControlToken::new(Arc::clone(&state));
        let blocked = thread::spawn(move || token.checkpoint());

        // The checkpoint must be parked on the gate, not spinning to an error.
        thread::sleep(Duration::from_millis(50));
        assert!(!blocked.is_finished(), "checkpoint should block while paused");

        state.request_cancel();
        let result = blocked.join().expect("checkpoint thread panicked");
        assert_eq!(result, Err(WorkError::Canceled));
    }

    #[test]
    fn test_resume_releases_paused_checkpoint() {
        let state = Arc::new(ControlState::new());
        state.request_pause();

        let token = ControlToken::new(Arc::clone(&state));
        let blocked = thread::spawn(move || token.checkpoint());

        thread::sleep(Duration::from_millis(50));
        state.request_resume();
        let result = blocked.join().expect("checkpoint thread panicked");
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_flags_settle_after_cancel() {
        let state = ControlState::new();
        state.reset_for_run();
        assert!(state.is_running());
        assert!(!state.is_finished());

        state.request_cancel();
        assert!(!state.is_running());
        assert!(!state.is_paused());
        assert!(state.is_finished());
    }
}
