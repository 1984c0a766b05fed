//! # Event subscribers for worker lifecycle observability.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used to deliver [`Event`](crate::events::Event)s to observers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Worker command / execution context ── publish(Event) ──► SubscriberSet
//!                                                                │
//!                                                        ┌───────┼───────┐
//!                                                        ▼       ▼       ▼
//!                                                  LogSubscriber  Metrics  ...
//! ```
//!
//! Delivery is synchronous on the publishing thread; a subscriber that
//! panics is contained and logged, never unwinding into the worker.
//!
//! ## Implementing custom subscribers
//! ```rust
//! use threadvisor::{Event, EventKind, Subscribe};
//!
//! struct FailureCounter;
//!
//! impl Subscribe for FailureCounter {
//!     fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::Failed {
//!             // increment a failure counter...
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use self::log::LogSubscriber;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
