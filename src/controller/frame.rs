//! # The frame loop.
//!
//! One controller thread, one cooperative loop: poll → dispatch events →
//! update panels → present, with optional frame pacing. Worker commands are
//! issued from panel callbacks and are therefore synchronous with the frame;
//! a blocking command (`join`, or `run`'s implicit join) visibly stalls
//! frame production, which is the accepted tradeoff of this design rather
//! than a hidden one.

use std::time::{Duration, Instant};

use crate::controller::{DisplayDriver, FrameConfig, FrameError, InputEvent, Panel};

/// Drives a stack of [`Panel`]s over a [`DisplayDriver`].
///
/// Stop conditions: a panel returns `false` from `on_event` or `Ok(false)`
/// from `on_update`, the driver delivers [`InputEvent::Quit`], the configured
/// frame limit is reached, or the driver fails to present.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use threadvisor::controller::{
///     FrameConfig, FrameError, FrameLoop, HeadlessDriver, Panel,
/// };
///
/// struct Countdown(u32);
///
/// impl Panel for Countdown {
///     fn on_update(&mut self, _dt: Duration) -> Result<bool, FrameError> {
///         self.0 -= 1;
///         Ok(self.0 > 0)
///     }
/// }
///
/// let mut frames = FrameLoop::new(FrameConfig::default(), HeadlessDriver::new());
/// frames.add_panel(Box::new(Countdown(3)));
/// assert_eq!(frames.run(), 3);
/// ```
pub struct FrameLoop<D: DisplayDriver> {
    cfg: FrameConfig,
    driver: D,
    panels: Vec<Box<dyn Panel>>,
    last_error: Option<FrameError>,
}

impl<D: DisplayDriver> FrameLoop<D> {
    /// Creates a loop over `driver` with no panels attached.
    pub fn new(cfg: FrameConfig, driver: D) -> Self {
        Self {
            cfg,
            driver,
            panels: Vec::new(),
            last_error: None,
        }
    }

    /// Adds a panel to the top of the stack (builder style).
    pub fn with_panel(mut self, panel: Box<dyn Panel>) -> Self {
        self.panels.push(panel);
        self
    }

    /// Adds a panel to the top of the stack.
    pub fn add_panel(&mut self, panel: Box<dyn Panel>) {
        self.panels.push(panel);
    }

    /// The most recent panel or driver error, if any.
    pub fn last_error(&self) -> Option<&FrameError> {
        self.last_error.as_ref()
    }

    /// The driver, e.g. to inspect a [`HeadlessDriver`](crate::controller::HeadlessDriver)
    /// after the loop stops.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Runs the loop until a stop condition; returns the number of frames
    /// produced. Panels attach before the first frame and detach, in reverse
    /// order, after the last.
    pub fn run(&mut self) -> u64 {
        for panel in &mut self.panels {
            panel.on_attach();
        }

        let mut frames: u64 = 0;
        let mut previous = Instant::now();
        let mut stop = false;

        while !stop {
            if let Some(limit) = self.cfg.frame_limit() {
                if frames >= limit {
                    break;
                }
            }
            let started = Instant::now();
            let dt = started.duration_since(previous);
            previous = started;

            for event in self.driver.poll_events() {
                for panel in &mut self.panels {
                    if !panel.on_event(&event) {
                        stop = true;
                    }
                }
                if event == InputEvent::Quit {
                    stop = true;
                }
            }
            if stop {
                break;
            }

            for panel in &mut self.panels {
                match panel.on_update(dt) {
                    Ok(true) => {}
                    Ok(false) => stop = true,
                    Err(error) => {
                        log::error!("panel `{}` failed: {}", panel.name(), error);
                        self.last_error = Some(error);
                    }
                }
            }

            if let Err(error) = self.driver.present() {
                log::error!("present failed: {error}");
                self.last_error = Some(error);
                break;
            }
            frames += 1;

            if let Some(budget) = self.cfg.budget() {
                let spent = started.elapsed();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }
        }

        for panel in self.panels.iter_mut().rev() {
            panel.on_detach();
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::HeadlessDriver;
    use crate::error::ControlError;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct Probe {
        label: &'static str,
        updates: Arc<AtomicU64>,
        attach_log: Arc<std::sync::Mutex<Vec<String>>>,
        stop_after: Option<u64>,
        fail_on_first_update: bool,
        stop_on_quit: bool,
    }

    impl Probe {
        fn new(label: &'static str, log: Arc<std::sync::Mutex<Vec<String>>>) -> Self {
            Self {
                label,
                updates: Arc::new(AtomicU64::new(0)),
                attach_log: log,
                stop_after: None,
                fail_on_first_update: false,
                stop_on_quit: false,
            }
        }
    }

    impl Panel for Probe {
        fn name(&self) -> &str {
            self.label
        }

        fn on_attach(&mut self) {
            self.attach_log
                .lock()
                .unwrap()
                .push(format!("attach:{}", self.label));
        }

        fn on_detach(&mut self) {
            self.attach_log
                .lock()
                .unwrap()
                .push(format!("detach:{}", self.label));
        }

        fn on_event(&mut self, event: &InputEvent) -> bool {
            !(self.stop_on_quit && *event == InputEvent::Quit)
        }

        fn on_update(&mut self, _dt: Duration) -> Result<bool, FrameError> {
            let n = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_first_update && n == 1 {
                return Err(FrameError::Control(ControlError::NotRunning {
                    worker: self.label.to_string(),
                }));
            }
            Ok(self.stop_after.map_or(true, |limit| n < limit))
        }
    }

    #[test]
    fn test_frame_limit_stops_the_loop() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut frames = FrameLoop::new(
            FrameConfig {
                max_frames: 4,
                ..FrameConfig::default()
            },
            HeadlessDriver::new(),
        );
        frames.add_panel(Box::new(Probe::new("a", log)));
        assert_eq!(frames.run(), 4);
        assert_eq!(frames.driver().frames(), 4);
    }

    #[test]
    fn test_panel_error_is_isolated_and_recorded() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut failing = Probe::new("failing", Arc::clone(&log));
        failing.fail_on_first_update = true;
        let healthy = Probe::new("healthy", Arc::clone(&log));
        let healthy_updates = Arc::clone(&healthy.updates);

        let mut frames = FrameLoop::new(
            FrameConfig {
                max_frames: 3,
                ..FrameConfig::default()
            },
            HeadlessDriver::new(),
        )
        .with_panel(Box::new(failing))
        .with_panel(Box::new(healthy));

        assert_eq!(frames.run(), 3, "an erroring panel must not end the loop");
        assert_eq!(
            healthy_updates.load(Ordering::SeqCst),
            3,
            "the healthy panel must update every frame"
        );
        assert_eq!(
            frames.last_error().map(FrameError::as_label),
            Some("control_not_running")
        );
    }

    #[test]
    fn test_quit_event_stops_after_dispatch() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut panel = Probe::new("p", Arc::clone(&log));
        panel.stop_on_quit = true;
        let driver = HeadlessDriver::with_script(vec![vec![], vec![InputEvent::Quit]]);
        let mut frames = FrameLoop::new(FrameConfig::default(), driver).with_panel(Box::new(panel));
        assert_eq!(frames.run(), 1, "quit frame itself does not present");
    }

    #[test]
    fn test_update_false_stops_and_detach_reverses_attach_order() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut first = Probe::new("first", Arc::clone(&log));
        first.stop_after = Some(2);
        let second = Probe::new("second", Arc::clone(&log));

        let mut frames = FrameLoop::new(FrameConfig::default(), HeadlessDriver::new())
            .with_panel(Box::new(first))
            .with_panel(Box::new(second));
        assert_eq!(frames.run(), 2);

        let seen = log.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "attach:first",
                "attach:second",
                "detach:second",
                "detach:first"
            ],
            "panels must detach in reverse attach order"
        );
    }
}
