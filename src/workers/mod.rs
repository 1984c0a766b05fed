//! # Worker abstractions and lifecycle control.
//!
//! This module provides the core worker-related types:
//! - [`Work`] - trait for implementing cancelable units of work
//! - [`WorkFn`] - function-backed work implementation
//! - [`WorkRef`] - shared reference to a work item (`Arc<dyn Work>`)
//! - [`Worker`] - one controllable execution slot: run, join, pause, resume,
//!   cancel, re-prioritize
//! - [`ControlToken`] - the cooperative control handle passed into work bodies
//! - [`Priority`] - five-level scheduling priority with a platform mapping

mod control;
mod priority;
mod work;
mod work_fn;
mod worker;

pub use control::ControlToken;
pub use priority::Priority;
pub use work::{Work, WorkRef};
pub use work_fn::WorkFn;
pub use worker::{Outcome, Worker};
