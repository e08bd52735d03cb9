//! # LogWriter: lifecycle events as `tracing` records
//!
//! A subscriber that turns every [`Event`] into a `tracing` record under the
//! `appvisor` target. Install any `tracing` subscriber (e.g.
//! `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO appvisor: starting unit="worker"
//! INFO appvisor: signal received signal="SIGTERM"
//! INFO appvisor: halt requested
//! WARN appvisor: termination timeout timeout_ms=5000
//! INFO appvisor: stopped
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let unit = e.unit.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::Starting => info!(target: "appvisor", seq = e.seq, unit, "starting"),
            EventKind::Stopped => match &e.reason {
                Some(err) => error!(target: "appvisor", seq = e.seq, error = %err, "stopped with error"),
                None => info!(target: "appvisor", seq = e.seq, "stopped"),
            },
            EventKind::ResourcesReady => {
                info!(target: "appvisor", seq = e.seq, unit, "resources ready")
            }
            EventKind::ResourcesInitFailed => {
                error!(target: "appvisor", seq = e.seq, unit, reason, "resources init failed")
            }
            EventKind::WatchExited => {
                warn!(target: "appvisor", seq = e.seq, unit, reason, "resources watch exited")
            }
            EventKind::ResourcesStopping => {
                info!(target: "appvisor", seq = e.seq, unit, "resources stopping")
            }
            EventKind::ResourcesReleased => {
                info!(target: "appvisor", seq = e.seq, unit, "resources released")
            }
            EventKind::ReleaseFailed => {
                error!(target: "appvisor", seq = e.seq, unit, reason, "resources release failed")
            }
            EventKind::MainStarting => info!(target: "appvisor", seq = e.seq, unit, "main starting"),
            EventKind::MainStopped => info!(target: "appvisor", seq = e.seq, unit, "main stopped"),
            EventKind::MainFailed => {
                error!(target: "appvisor", seq = e.seq, unit, reason, "main failed")
            }
            EventKind::MainAborted => warn!(target: "appvisor", seq = e.seq, unit, "main aborted"),
            EventKind::SignalReceived => info!(
                target: "appvisor",
                seq = e.seq,
                signal = e.signal.unwrap_or("unknown"),
                "signal received"
            ),
            EventKind::HaltRequested => info!(target: "appvisor", seq = e.seq, "halt requested"),
            EventKind::ShutdownRequested => {
                info!(target: "appvisor", seq = e.seq, "shutdown requested")
            }
            EventKind::TerminationTimeout => warn!(
                target: "appvisor",
                seq = e.seq,
                timeout_ms = e.timeout_ms.unwrap_or_default(),
                "termination timeout"
            ),
            EventKind::SubscriberOverflow => {
                warn!(target: "appvisor", seq = e.seq, subscriber = unit, reason, "subscriber overflow")
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "appvisor", seq = e.seq, subscriber = unit, reason, "subscriber panicked")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
