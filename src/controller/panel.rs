//! # Panel: the capability interface of one interactive demo.
//!
//! A panel owns its workers and workspaces and reacts to the frame loop's
//! callbacks. Panels compose: the [`FrameLoop`](crate::controller::FrameLoop)
//! holds a stack of them and drives each one per frame, isolating failures.

use std::time::Duration;

use crate::controller::{FrameError, InputEvent};

/// One attachable unit of interactive behavior.
///
/// Lifecycle: `on_attach` once when the loop starts, then per frame
/// `on_event` for each polled input event and one `on_update`, then
/// `on_detach` once when the loop stops (panels detach in reverse attach
/// order).
pub trait Panel {
    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once before the first frame.
    fn on_attach(&mut self) {}

    /// Called once after the last frame, in reverse attach order.
    ///
    /// Worker teardown (cancel + join) belongs here or in the panel's own
    /// `Drop`; both run before the loop returns.
    fn on_detach(&mut self) {}

    /// Reacts to one input event. Returning `false` stops the loop.
    fn on_event(&mut self, event: &InputEvent) -> bool {
        let _ = event;
        true
    }

    /// Advances one frame. Returning `Ok(false)` stops the loop.
    ///
    /// Errors are caught by the loop, logged, and recorded as its
    /// `last_error`; the frame and the other panels proceed.
    fn on_update(&mut self, dt: Duration) -> Result<bool, FrameError>;
}
