//! # SubscriberSet: panic-isolated fan-out over multiple subscribers
//!
//! [`SubscriberSet`] delivers each [`Event`](crate::events::Event) to every
//! subscriber in registration order, on the publishing thread. A subscriber
//! that panics is contained and logged; the remaining subscribers still see
//! the event, and the publisher never observes the unwind.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Immutable fan-out list of subscribers.
pub struct SubscriberSet {
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers.
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subscribers }
    }

    /// Creates an empty set (publishing becomes a no-op).
    pub fn empty() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Number of registered subscribers.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// True when no subscribers are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Delivers `event` to every subscriber, containing panics.
    pub fn publish(&self, event: &Event) {
        for subscriber in &self.subscribers {
            let delivered =
                panic::catch_unwind(AssertUnwindSafe(|| subscriber.on_event(event)));
            if delivered.is_err() {
                log::error!(
                    "subscriber `{}` panicked handling {}",
                    subscriber.name(),
                    event.kind.as_label()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recorder(Arc<AtomicUsize>);

    impl Subscribe for Recorder {
        fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Exploder;

    impl Subscribe for Exploder {
        fn on_event(&self, _event: &Event) {
            panic!("subscriber bug");
        }
    }

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let hits = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(vec![
            Arc::new(Recorder(Arc::clone(&hits))),
            Arc::new(Recorder(Arc::clone(&hits))),
        ]);
        set.publish(&Event::new(EventKind::Starting));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_the_rest() {
        let hits = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(vec![
            Arc::new(Exploder),
            Arc::new(Recorder(Arc::clone(&hits))),
        ]);
        set.publish(&Event::new(EventKind::Stopped));
        assert_eq!(
            hits.load(Ordering::SeqCst),
            1,
            "subscribers after the panicking one must still run"
        );
    }

    #[test]
    fn test_empty_set_is_a_noop() {
        let set = SubscriberSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        set.publish(&Event::new(EventKind::Canceled));
    }
}
