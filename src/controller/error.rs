use thiserror::Error;

use crate::error::{ControlError, LockError};

/// Error surfaced by a [`Panel`](crate::controller::Panel) update or a
/// [`DisplayDriver`](crate::controller::DisplayDriver) present.
///
/// The frame loop catches these per panel, per frame: one panel's failure
/// never affects the other panels or the loop itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FrameError {
    /// A worker command failed.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// A workspace/lock operation failed.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// The display driver refused to present.
    #[error("display driver failure: {0}")]
    Driver(String),
}

impl FrameError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FrameError::Control(e) => e.as_label(),
            FrameError::Lock(e) => e.as_label(),
            FrameError::Driver(_) => "frame_driver_failure",
        }
    }
}
