//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `App::run`, `Lifecycle` (halt/shutdown winners), the watch
//!   unit, the signal listener, the main routine runner, `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumer**: the per-run fan-out started by `App::run`, which forwards
//!   every event to the configured subscribers.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
