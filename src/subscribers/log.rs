//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogSubscriber`] renders events through the `log` facade in a
//! human-readable format.
//!
//! ## Output format
//! ```text
//! [starting] worker=sim
//! [stopped] worker=sim
//! [failed] worker=sim err="grid size mismatch"
//! [canceled] worker=sim
//! [pause-requested] worker=sim
//! [resumed] worker=sim
//! [cancel-requested] worker=sim
//! [priority] worker=sim priority=high
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// `log`-backed event subscriber.
///
/// Enabled via the `logging` feature. Intended for development and demos;
/// implement a custom [`Subscribe`] for structured logging or metrics.
#[derive(Default)]
pub struct LogSubscriber;

impl Subscribe for LogSubscriber {
    fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::Starting => log::info!("[starting] worker={worker}"),
            EventKind::Stopped => log::info!("[stopped] worker={worker}"),
            EventKind::Failed => {
                let reason = e.reason.as_deref().unwrap_or("unknown");
                log::warn!("[failed] worker={worker} err={reason:?}");
            }
            EventKind::Canceled => log::info!("[canceled] worker={worker}"),
            EventKind::PauseRequested => log::info!("[pause-requested] worker={worker}"),
            EventKind::Resumed => log::info!("[resumed] worker={worker}"),
            EventKind::CancelRequested => log::info!("[cancel-requested] worker={worker}"),
            EventKind::PriorityChanged => {
                let priority = e.priority.map(|p| p.as_label()).unwrap_or("?");
                log::info!("[priority] worker={worker} priority={priority}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
