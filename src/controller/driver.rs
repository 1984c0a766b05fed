//! # Display driver seam.
//!
//! The frame loop talks to the windowing/rendering world through
//! [`DisplayDriver`]: poll input, present a frame. Real backends (a window +
//! GPU surface) live outside this crate; [`HeadlessDriver`] is the built-in
//! backend for tests and terminal demos.

use std::collections::VecDeque;

use crate::controller::FrameError;

/// Input event delivered by the display driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The user asked the application to close.
    Quit,
    /// A key press, by platform key code.
    Key {
        /// Platform key code.
        code: u32,
    },
    /// Pointer position and primary-button state.
    Pointer {
        /// Horizontal position in window coordinates.
        x: f32,
        /// Vertical position in window coordinates.
        y: f32,
        /// Primary button held?
        pressed: bool,
    },
}

/// Window/input/present abstraction the frame loop drives.
pub trait DisplayDriver {
    /// Drains the input events that arrived since the last poll.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Presents the finished frame.
    fn present(&mut self) -> Result<(), FrameError>;
}

/// Scripted, windowless driver for tests and headless demos.
///
/// Each call to [`poll_events`](DisplayDriver::poll_events) pops the next
/// scripted batch (empty once the script runs out); `present` counts frames.
#[derive(Default)]
pub struct HeadlessDriver {
    script: VecDeque<Vec<InputEvent>>,
    frames: u64,
}

impl HeadlessDriver {
    /// Creates a driver with no scripted input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver that replays `script`, one batch per frame.
    pub fn with_script(script: Vec<Vec<InputEvent>>) -> Self {
        Self {
            script: script.into(),
            frames: 0,
        }
    }

    /// Frames presented so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DisplayDriver for HeadlessDriver {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.script.pop_front().unwrap_or_default()
    }

    fn present(&mut self) -> Result<(), FrameError> {
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_replays_script_then_goes_quiet() {
        let mut driver = HeadlessDriver::with_script(vec![
            vec![InputEvent::Key { code: 32 }],
            vec![],
            vec![InputEvent::Quit],
        ]);
        assert_eq!(driver.poll_events(), vec![InputEvent::Key { code: 32 }]);
        assert_eq!(driver.poll_events(), vec![]);
        assert_eq!(driver.poll_events(), vec![InputEvent::Quit]);
        assert_eq!(driver.poll_events(), vec![], "exhausted script stays quiet");
    }

    #[test]
    fn test_present_counts_frames() {
        let mut driver = HeadlessDriver::new();
        driver.present().expect("present");
        driver.present().expect("present");
        assert_eq!(driver.frames(), 2);
    }
}
