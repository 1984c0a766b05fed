//! # Frame-loop controller shell.
//!
//! The controller is the sole consumer of [`Worker`](crate::Worker)s: a
//! long-lived loop that, once per frame, polls input, lets each attached
//! [`Panel`] react and issue worker commands, and presents the frame through
//! a [`DisplayDriver`]. Rendering and windowing stay behind the driver seam;
//! this crate ships only the [`HeadlessDriver`] used by tests and demos.
//!
//! ## Frame
//! ```text
//! loop {
//!   events = driver.poll_events()
//!   for event in events: each panel.on_event(event)      // false = stop
//!   for panel: panel.on_update(dt)                       // Err logged, frame continues
//!   driver.present()
//! }
//! ```
//!
//! A panel's error never aborts the frame or the other panels: it is logged
//! and retained as [`FrameLoop::last_error`]. Group operations across many
//! workers stay independent per-worker commands; the loop adds no atomic
//! "pause all" primitive.

pub mod config;
pub mod error;

mod driver;
mod frame;
mod panel;

pub use config::FrameConfig;
pub use driver::{DisplayDriver, HeadlessDriver, InputEvent};
pub use error::FrameError;
pub use frame::FrameLoop;
pub use panel::Panel;
