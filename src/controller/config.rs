use std::time::Duration;

/// Configuration for the frame loop.
///
/// ## Field semantics
/// - `frame_budget`: minimum wall-clock duration of one frame; the loop
///   sleeps the remainder after presenting (`Duration::ZERO` = uncapped)
/// - `max_frames`: stop after this many frames (`0` = run until a stop
///   condition; useful for tests and headless demos)
#[derive(Clone, Debug)]
pub struct FrameConfig {
    /// Minimum duration of one frame (`Duration::ZERO` = uncapped).
    pub frame_budget: Duration,

    /// Frame count limit (`0` = unlimited).
    pub max_frames: u64,
}

impl FrameConfig {
    /// Returns the frame budget as an `Option`.
    ///
    /// - `None` → uncapped
    /// - `Some(d)` → each frame takes at least `d`
    #[inline]
    pub fn budget(&self) -> Option<Duration> {
        if self.frame_budget.is_zero() {
            None
        } else {
            Some(self.frame_budget)
        }
    }

    /// Returns the frame limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → the loop stops after `n` frames
    #[inline]
    pub fn frame_limit(&self) -> Option<u64> {
        if self.max_frames == 0 {
            None
        } else {
            Some(self.max_frames)
        }
    }
}

impl Default for FrameConfig {
    /// Default configuration: uncapped frame rate, unlimited frames.
    fn default() -> Self {
        Self {
            frame_budget: Duration::ZERO,
            max_frames: 0,
        }
    }
}
