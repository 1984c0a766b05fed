//! # Work abstraction.
//!
//! This module defines the [`Work`] trait: a synchronous, cancelable unit of
//! work executed on a worker's native thread. The common handle type is
//! [`WorkRef`], an `Arc<dyn Work>` suitable for rebinding and re-running.
//!
//! A work body receives a [`ControlToken`] and must call
//! [`checkpoint`](ControlToken::checkpoint) at bounded intervals: the
//! checkpoint is where a pause takes effect and where a cancellation request
//! is observed. Work that never checkpoints cannot be paused or canceled.

use std::sync::Arc;

use crate::error::WorkError;
use crate::workers::ControlToken;

/// # Synchronous, cancelable unit of work.
///
/// `Work` runs once per [`Worker::run`](crate::Worker::run), on a dedicated
/// OS thread. Results are communicated through captured shared state (for
/// example a [`Workspace`](crate::Workspace)), not through a return value.
///
/// # Example
/// ```
/// use threadvisor::{ControlToken, Work, WorkError};
///
/// struct Demo;
///
/// impl Work for Demo {
///     fn run(&self, ctx: &ControlToken) -> Result<(), WorkError> {
///         for _ in 0..1000 {
///             ctx.checkpoint()?;
///             // one bounded step of computation...
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Work: Send + Sync + 'static {
    /// Executes the work until completion, failure, or an observed
    /// cancellation request.
    ///
    /// Implementations must call `ctx.checkpoint()?` between bounded steps so
    /// pause and cancel commands take effect promptly.
    fn run(&self, ctx: &ControlToken) -> Result<(), WorkError>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a work item.
pub type WorkRef = Arc<dyn Work>;
