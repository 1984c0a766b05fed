//! # One controllable execution slot.
//!
//! [`Worker`] wraps one bound unit of work and at most one native OS thread.
//! The owning controller drives it synchronously: `run`, `join`, `pause`,
//! `resume`, `cancel`, `set_priority`; the polling observers (`is_running`,
//! `is_paused`, `is_finished`) never block and are safe to call every frame.
//!
//! ## Lifecycle
//! ```text
//! Unbound ──bind──► Bound ──run──► Running ⇄ Paused
//!                     ▲               │         │
//!                     │            work body  cancel
//!                     │            returns      │
//!                     └──join/reap─ Finished ◄──┘
//! ```
//!
//! ## Blocking behavior
//! - `join` blocks the calling thread until the execution context exits.
//! - `run` on a worker whose previous context has not been reaped performs a
//!   **documented implicit join** first. Callers that must not block should
//!   observe [`is_finished`](Worker::is_finished) before re-running.
//! - `pause`, `resume`, `cancel`, `set_priority` do not block; they are
//!   requests the execution context observes at its next checkpoint (pause,
//!   cancel) or that the platform scheduler applies (priority).
//!
//! ## Teardown
//! Dropping a worker with a live context requests cancellation, joins the
//! thread, and absorbs (logs) any error: no execution context outlives its
//! worker, and teardown never panics.

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

use crate::error::{ControlError, WorkError};
use crate::events::{Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::workers::control::{ControlState, ControlToken};
use crate::workers::{priority, Priority, WorkRef};

/// Terminal result of one execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The work body returned `Ok(())`.
    Completed,
    /// The work body observed a cancellation request and stopped.
    Canceled,
    /// The work body returned [`WorkError::Failed`].
    Failed(String),
    /// The work body panicked; the panic was contained to the worker thread.
    Panicked(String),
}

impl Outcome {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Completed => "outcome_completed",
            Outcome::Canceled => "outcome_canceled",
            Outcome::Failed(_) => "outcome_failed",
            Outcome::Panicked(_) => "outcome_panicked",
        }
    }
}

/// # Controllable worker: one job slot, one native thread at a time.
///
/// A `Worker` is owned by its controller; it is not `Clone`. Binding attaches
/// a [`WorkRef`]; `run` starts a fresh execution context for it. Results flow
/// through shared state captured by the work body.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use threadvisor::{ControlToken, Outcome, WorkFn, Worker};
///
/// let hits = Arc::new(AtomicU64::new(0));
/// let seen = Arc::clone(&hits);
///
/// let mut worker = Worker::with_work(
///     "demo",
///     WorkFn::arc("demo", move |ctx: &ControlToken| {
///         for _ in 0..100 {
///             ctx.checkpoint()?;
///             seen.fetch_add(1, Ordering::Relaxed);
///         }
///         Ok(())
///     }),
/// );
///
/// worker.run()?;
/// assert_eq!(worker.join()?, Outcome::Completed);
/// assert_eq!(hits.load(Ordering::Relaxed), 100);
/// # Ok::<(), threadvisor::ControlError>(())
/// ```
pub struct Worker {
    name: Cow<'static, str>,
    work: Option<WorkRef>,
    handle: Option<JoinHandle<()>>,
    state: Arc<ControlState>,
    priority: Priority,
    subscribers: Arc<SubscriberSet>,
}

impl Worker {
    /// Creates an unbound worker slot.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            work: None,
            handle: None,
            state: Arc::new(ControlState::new()),
            priority: Priority::default(),
            subscribers: Arc::new(SubscriberSet::empty()),
        }
    }

    /// Creates a worker with work already bound.
    pub fn with_work(name: impl Into<Cow<'static, str>>, work: WorkRef) -> Self {
        let mut worker = Self::new(name);
        worker.work = Some(work);
        worker
    }

    /// Attaches event subscribers (builder style).
    ///
    /// Subscribers observe lifecycle events from whichever thread performs
    /// the transition; see [`Subscribe`] for the contract.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = Arc::new(SubscriberSet::new(subscribers));
        self
    }

    /// Worker name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds (or rebinds) the unit of work to run.
    ///
    /// ### Errors
    /// [`ControlError::Rebind`] while a previous execution context is live;
    /// rebinding after a finished run is allowed without joining first.
    pub fn bind(&mut self, work: WorkRef) -> Result<(), ControlError> {
        if self.context_live() {
            return Err(ControlError::Rebind {
                worker: self.name.to_string(),
            });
        }
        self.work = Some(work);
        Ok(())
    }

    /// Starts the bound work on a new execution context.
    ///
    /// If a previous context exists it is joined first — this is the
    /// documented implicit-join behavior, and it blocks until that context
    /// exits. A paused previous context is refused instead of deadlocking.
    ///
    /// ### Errors
    /// - [`ControlError::Unbound`]: no work bound.
    /// - [`ControlError::JoinWhilePaused`]: previous context is paused.
    /// - [`ControlError::ThreadCreationFailed`]: platform refused to spawn.
    pub fn run(&mut self) -> Result<(), ControlError> {
        let work = self.work.clone().ok_or_else(|| ControlError::Unbound {
            worker: self.name.to_string(),
        })?;
        if self.is_paused() && !self.is_finished() {
            return Err(ControlError::JoinWhilePaused {
                worker: self.name.to_string(),
            });
        }
        self.reap();

        self.state.reset_for_run();

        let state = Arc::clone(&self.state);
        let subscribers = Arc::clone(&self.subscribers);
        let wname: Arc<str> = Arc::from(self.name.as_ref());
        let priority = self.priority;

        let spawned = Builder::new()
            .name(self.name.to_string())
            .spawn(move || Self::execute(state, subscribers, wname, priority, work));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(source) => {
                self.state.mark_spawn_failed();
                Err(ControlError::ThreadCreationFailed {
                    worker: self.name.to_string(),
                    source,
                })
            }
        }
    }

    /// Blocks until the execution context exits, reaps it, and returns the
    /// terminal [`Outcome`].
    ///
    /// ### Errors
    /// - [`ControlError::NoActiveContext`]: nothing to join.
    /// - [`ControlError::JoinWhilePaused`]: the worker is paused; a paused
    ///   context never reaches the checkpoint that would let it finish, so
    ///   the caller must [`resume`](Worker::resume) first.
    pub fn join(&mut self) -> Result<Outcome, ControlError> {
        if self.handle.is_none() {
            return Err(ControlError::NoActiveContext {
                worker: self.name.to_string(),
            });
        }
        // A stale pause flag on an already-finished context must not wedge
        // the join; only a genuinely parked context is refused.
        if self.is_paused() && !self.is_finished() {
            return Err(ControlError::JoinWhilePaused {
                worker: self.name.to_string(),
            });
        }
        self.reap();
        Ok(self.state.outcome().unwrap_or(Outcome::Completed))
    }

    /// Raises the pause gate; the execution context parks at its next
    /// checkpoint. Idempotent while running.
    ///
    /// Coarse suspension caveat: work that fans out internally (e.g. a
    /// data-parallel step) finishes the step in flight; only the outer
    /// checkpoint loop parks.
    ///
    /// ### Errors
    /// [`ControlError::NotRunning`] when no context is running.
    pub fn pause(&mut self) -> Result<(), ControlError> {
        if !self.is_running() {
            return Err(ControlError::NotRunning {
                worker: self.name.to_string(),
            });
        }
        self.state.request_pause();
        self.publish(Event::new(EventKind::PauseRequested));
        Ok(())
    }

    /// Lowers the pause gate and wakes the execution context.
    ///
    /// ### Errors
    /// [`ControlError::NotRunning`] when no context is running.
    pub fn resume(&mut self) -> Result<(), ControlError> {
        if !self.is_running() {
            return Err(ControlError::NotRunning {
                worker: self.name.to_string(),
            });
        }
        self.state.request_resume();
        self.publish(Event::new(EventKind::Resumed));
        Ok(())
    }

    /// Requests cancellation and returns without blocking.
    ///
    /// The observers flip to their terminal state immediately
    /// (`is_finished() == true`, `is_running() == false`,
    /// `is_paused() == false`); the execution context unwinds at its next
    /// checkpoint and is reaped by the next `run`, an explicit `join`
    /// (yielding [`Outcome::Canceled`]), or drop.
    ///
    /// There is no unconditional kill: work that never checkpoints is never
    /// interrupted, and no thread dies holding a lock it acquired.
    ///
    /// ### Errors
    /// [`ControlError::NotRunning`] when no context is running.
    pub fn cancel(&mut self) -> Result<(), ControlError> {
        if !self.is_running() {
            return Err(ControlError::NotRunning {
                worker: self.name.to_string(),
            });
        }
        self.state.request_cancel();
        self.publish(Event::new(EventKind::CancelRequested));
        Ok(())
    }

    /// Updates the cached priority, applying it to the live execution context
    /// when one exists.
    ///
    /// With no live context the new value is cached and applied at the next
    /// `run`. On non-Linux targets the value is cached only.
    ///
    /// ### Errors
    /// [`ControlError::PriorityChangeFailed`] when the platform scheduler
    /// refuses (the cache is still updated).
    pub fn set_priority(&mut self, priority: Priority) -> Result<(), ControlError> {
        self.priority = priority;
        self.publish(Event::new(EventKind::PriorityChanged).with_priority(priority));

        if !self.is_running() {
            return Ok(());
        }
        let tid = self.state.native_id();
        if tid == 0 {
            // Context spawned but has not recorded its id yet; the spawn
            // prologue applies the cached value.
            return Ok(());
        }
        priority::apply_to_thread(tid, priority).map_err(|errno| {
            ControlError::PriorityChangeFailed {
                worker: self.name.to_string(),
                priority,
                errno,
            }
        })
    }

    /// Cached priority. Valid with or without a live execution context.
    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Non-blocking observer: is an execution context running?
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Non-blocking observer: is the pause gate raised?
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Non-blocking observer: has the last execution context finished
    /// (normally or through a cancel request)?
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Terminal outcome of the last execution context, if any finished yet.
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// True while an execution context exists that has not finished.
    fn context_live(&self) -> bool {
        self.handle.is_some() && !self.is_finished()
    }

    /// Joins and discards the thread handle, if any.
    fn reap(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                // The work body runs under catch_unwind; reaching here means
                // the epilogue itself blew up, which we only record.
                log::warn!(
                    "worker `{}`: execution context panicked outside the work body",
                    self.name
                );
            }
        }
    }

    fn publish(&self, event: Event) {
        self.subscribers
            .publish(&event.with_worker(Arc::from(self.name.as_ref())));
    }

    /// Body of the execution context.
    fn execute(
        state: Arc<ControlState>,
        subscribers: Arc<SubscriberSet>,
        name: Arc<str>,
        priority: Priority,
        work: WorkRef,
    ) {
        state.record_native_id(priority::current_thread_id());
        if let Err(errno) = priority::apply_to_thread(state.native_id(), priority) {
            log::warn!("worker `{name}`: could not apply priority {priority:?} (errno {errno})");
        }
        subscribers.publish(&Event::new(EventKind::Starting).with_worker(Arc::clone(&name)));

        let token = ControlToken::new(Arc::clone(&state));
        let result = panic::catch_unwind(AssertUnwindSafe(|| work.run(&token)));

        let outcome = match result {
            Ok(Ok(())) => Outcome::Completed,
            Ok(Err(WorkError::Canceled)) => Outcome::Canceled,
            Ok(Err(WorkError::Failed { error })) => Outcome::Failed(error),
            Err(payload) => Outcome::Panicked(panic_message(payload.as_ref())),
        };

        let event = match &outcome {
            Outcome::Completed => Event::new(EventKind::Stopped),
            Outcome::Canceled => Event::new(EventKind::Canceled),
            Outcome::Failed(reason) => {
                Event::new(EventKind::Failed).with_reason(Arc::from(reason.as_str()))
            }
            Outcome::Panicked(reason) => {
                Event::new(EventKind::Failed).with_reason(Arc::from(reason.as_str()))
            }
        };

        state.finish(outcome);
        subscribers.publish(&event.with_worker(name));
    }
}

impl Drop for Worker {
    /// Requests cancellation (if live) and joins; errors are absorbed and
    /// logged because no caller remains to receive them.
    fn drop(&mut self) {
        if self.handle.is_some() {
            if self.is_running() {
                self.state.request_cancel();
            }
            self.reap();
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("bound", &self.work.is_some())
            .field("running", &self.is_running())
            .field("paused", &self.is_paused())
            .field("finished", &self.is_finished())
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
