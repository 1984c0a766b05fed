//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers
//! into a worker. Handlers run synchronously on whichever thread performs
//! the transition — the controller thread for command events, the worker's
//! execution context for thread-side events.
//!
//! ## Contract
//! - Implementations must be cheap: a slow handler delays the transition it
//!   observes (there is no queue between publisher and subscriber).
//! - Panics are contained by the [`SubscriberSet`](crate::SubscriberSet)
//!   and logged; they never unwind into the publisher.

use crate::events::Event;

/// Contract for event subscribers.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
