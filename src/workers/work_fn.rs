//! # Function-backed work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(&ControlToken) -> Result<(), WorkError>`.
//! The closure is invoked afresh on every [`Worker::run`](crate::Worker::run),
//! so a worker can be re-run without rebinding.
//!
//! ## Concurrency semantics
//! - The closure is `Fn`, not `FnMut`: no hidden mutation between runs.
//! - Shared state between the work body and its controller goes through an
//!   explicit `Arc` (atomics, [`Workspace`](crate::Workspace)), captured by
//!   the closure.
//!
//! ## Example
//! ```rust
//! use threadvisor::{ControlToken, Work, WorkFn, WorkRef, WorkError};
//!
//! let w: WorkRef = WorkFn::arc("count", |ctx: &ControlToken| {
//!     for _ in 0..10 {
//!         ctx.checkpoint()?;
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(w.name(), "count");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::WorkError;
use crate::workers::{ControlToken, Work};

/// Function-backed work implementation.
///
/// Wraps a closure that is called once per run.
pub struct WorkFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates a new function-backed work item.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`WorkRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the work item and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Work for WorkFn<F>
where
    F: Fn(&ControlToken) -> Result<(), WorkError> + Send + Sync + 'static,
{
    fn run(&self, ctx: &ControlToken) -> Result<(), WorkError> {
        (self.f)(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
