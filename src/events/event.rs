//! # Lifecycle events emitted during a run.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata
//! (timestamp, unit name, reason, signal, timeout).
//!
//! Events are informational only. They never influence control flow or the
//! result of [`App::run`](crate::App::run).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order across subscribers.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use appvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TerminationTimeout)
//!     .with_unit("worker")
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::TerminationTimeout);
//! assert_eq!(ev.unit.as_deref(), Some("worker"));
//! assert_eq!(ev.timeout_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run ===
    /// `run` won the `Init → Running` transition.
    ///
    /// Sets: `unit` (main routine name)
    Starting,

    /// `run` finished; no events of this run follow.
    ///
    /// Sets: `reason` (final error, if any)
    Stopped,

    // === Resources ===
    /// Resources initialized successfully.
    ///
    /// Sets: `unit` (resources name)
    ResourcesReady,

    /// Resources failed to initialize (error or deadline).
    ///
    /// Sets: `unit`, `reason`
    ResourcesInitFailed,

    /// The watch unit returned (always fatal for the run).
    ///
    /// Sets: `unit`, `reason` (error, if any)
    WatchExited,

    /// Teardown started: `stop` was requested from resources.
    ///
    /// Sets: `unit`
    ResourcesStopping,

    /// Resources released successfully.
    ///
    /// Sets: `unit`
    ResourcesReleased,

    /// Releasing resources failed.
    ///
    /// Sets: `unit`, `reason`
    ReleaseFailed,

    // === Main routine ===
    /// Main routine spawned.
    ///
    /// Sets: `unit`
    MainStarting,

    /// Main routine returned `Ok`.
    ///
    /// Sets: `unit`
    MainStopped,

    /// Main routine returned an error or panicked.
    ///
    /// Sets: `unit`, `reason`
    MainFailed,

    /// Main routine was aborted after the grace period.
    ///
    /// Sets: `unit`
    MainAborted,

    // === Shutdown ===
    /// A termination signal was received from the OS.
    ///
    /// Sets: `signal`
    SignalReceived,

    /// `Running → Halting` happened; the halt signal is closed.
    HaltRequested,

    /// `Halting → Shutdown` (or forced `Running → Shutdown`) happened.
    ShutdownRequested,

    /// Grace period elapsed after halt without the run completing.
    ///
    /// Sets: `timeout_ms`
    TerminationTimeout,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `unit` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `unit` (subscriber name), `reason` (panic info)
    SubscriberPanicked,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the unit involved (routine, resources, subscriber).
    pub unit: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Name of the OS signal, for [`EventKind::SignalReceived`].
    pub signal: Option<&'static str>,
    /// Timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            unit: None,
            reason: None,
            signal: None,
            timeout_ms: None,
        }
    }

    /// Attaches a unit name.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the name of the received OS signal.
    #[inline]
    pub fn with_signal(mut self, signal: &'static str) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_unit(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_unit(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::HaltRequested);
        let b = Event::new(EventKind::ShutdownRequested);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timeout_saturates() {
        let ev = Event::new(EventKind::TerminationTimeout).with_timeout(Duration::MAX);
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_overflow_sets_unit_and_reason() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.unit.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
    }
}
