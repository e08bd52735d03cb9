//! # Lifecycle event subscribers.
//!
//! ```text
//! actors ── publish(Event) ──► Bus ──► run fan-out ──► SubscriberSet
//!                                                        ├──► LogWriter
//!                                                        ├──► Metrics (yours)
//!                                                        └──► ...
//! ```
//!
//! The fan-out is started when `run` begins and drained after the final
//! [`EventKind::Stopped`](crate::EventKind::Stopped), so every event of a run
//! reaches its subscribers before `run` returns.

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
