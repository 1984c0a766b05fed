//! # threadvisor
//!
//! **Threadvisor** is a small control surface for long-running computations
//! driven from an interactive frontend.
//!
//! It provides primitives to bind, start, pause, resume, cancel, and
//! re-prioritize units of work running on native OS threads, and to exchange
//! results between a background computation and a per-frame controller
//! through lock-protected, double-buffered workspaces.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    WorkFn    │   │    WorkFn    │   │  impl Work   │
//!     │ (user job #1)│   │ (user job #2)│   │ (user job #3)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ bind             ▼ bind             ▼ bind
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Worker    │   │    Worker    │   │    Worker    │
//!     │ (job slot)   │   │ (job slot)   │   │ (job slot)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ run/join/pause/resume/cancel/set_priority
//!            ▼                  ▼                  ▼
//!     ┌─────────────────────────────────────────────────────┐
//!     │  Controller thread (one cooperative frame loop)     │
//!     │  - polls is_running / is_paused / is_finished       │
//!     │  - issues commands from user interaction            │
//!     │  - snapshots Workspace state for display            │
//!     └─────────────────────────────────────────────────────┘
//!            ▲                  ▲
//!            │ publish/refresh  │ events
//!     ┌──────┴────────┐  ┌──────┴────────┐
//!     │  Workspace<T> │  │ SubscriberSet │
//!     │ (ExclusiveLock│  │ (LogSubscriber│
//!     │  + generations)│ │  + custom)    │
//!     └───────────────┘  └───────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Worker::bind(work) ──► Worker::run()
//!
//!   run:
//!   ├─► implicit join of a previous context (documented blocking)
//!   ├─► spawn named OS thread
//!   │       ├─ record native id, apply cached priority
//!   │       ├─ publish Starting
//!   │       ├─ work.run(&ControlToken)   (catch_unwind)
//!   │       │     └─ ctx.checkpoint()?   ◄─ pause parks here,
//!   │       │                               cancel surfaces here
//!   │       └─ store Outcome, flip flags, publish terminal event
//!   │
//!   └─ controller polls flags each frame; join() reaps and
//!      returns the Outcome
//! ```
//!
//! ## Features
//! | Area            | Description                                                          | Key types / traits                      |
//! |-----------------|----------------------------------------------------------------------|-----------------------------------------|
//! | **Workers**     | Bind and control cancelable units of work on native threads.         | [`Worker`], [`Work`], [`WorkFn`]        |
//! | **Control**     | Cooperative pause/cancel checkpoints inside work bodies.             | [`ControlToken`]                        |
//! | **Priority**    | Five-level scheduling priority, cached and applied to live threads.  | [`Priority`]                            |
//! | **Shared state**| Owner-tracked locking and double-buffered workspaces.                | [`ExclusiveLock`], [`Workspace`]        |
//! | **Errors**      | Typed errors for control, work, and lock failure domains.            | [`ControlError`], [`WorkError`], [`LockError`] |
//! | **Events**      | Sequence-numbered lifecycle events fanned out to subscribers.        | [`Event`], [`Subscribe`]                |
//!
//! ## Optional features
//! - `logging` *(default)*: exports a simple built-in [`LogSubscriber`] _(demo/reference only)_.
//! - `controller`: exposes the frame-loop shell ([`controller`] module).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use threadvisor::{ControlToken, Outcome, WorkFn, Worker, Workspace};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Shared state: the controller displays it, the worker computes it.
//!     let ws = Arc::new(Workspace::new(vec![0u64; 4]));
//!     let shared = Arc::clone(&ws);
//!
//!     let mut worker = Worker::with_work(
//!         "fill",
//!         WorkFn::arc("fill", move |ctx: &ControlToken| {
//!             let mut copy = shared.checkout()?;
//!             for i in 0..copy.get().len() {
//!                 ctx.checkpoint()?; // pause/cancel take effect here
//!                 copy.get_mut()[i] = (i as u64) + 1;
//!             }
//!             copy.publish(&shared)?;
//!             Ok(())
//!         }),
//!     );
//!
//!     worker.run()?;
//!     assert_eq!(worker.join()?, Outcome::Completed);
//!     assert_eq!(ws.snapshot()?, vec![1, 2, 3, 4]);
//!     Ok(())
//! }
//! ```

mod error;
mod events;
mod subscribers;
mod sync;
mod workers;

// ---- Public re-exports ----

pub use error::{ControlError, LockError, WorkError};
pub use events::{Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use sync::{ExclusiveLock, LockGuard, Workspace, WorkingCopy};
pub use workers::{ControlToken, Outcome, Priority, Work, WorkFn, WorkRef, Worker};

// Optional: expose the frame-loop controller shell.
// Enable with: `--features controller`
#[cfg(feature = "controller")]
pub mod controller;

// Optional: expose a simple built-in `log`-backed subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogSubscriber;
