//! # Shared-state primitives for worker/controller exchange.
//!
//! - [`ExclusiveLock`] - owner-tracked mutual exclusion with abandon
//!   detection, the one always-shared primitive of the crate
//! - [`Workspace`] / [`WorkingCopy`] - the double-buffered publish/refresh
//!   discipline for state a background worker computes and a controller
//!   displays and edits

mod exclusive;
mod workspace;

pub use exclusive::{ExclusiveLock, LockGuard};
pub use workspace::{Workspace, WorkingCopy};
