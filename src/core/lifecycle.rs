//! # Shared lifecycle of one application instance.
//!
//! [`Lifecycle`] bundles everything the concurrent actors of a run share:
//! the state guard, the two one-shot signals, the error latch and the event
//! bus. It is created with the [`App`](crate::App) and lives as long as any
//! actor holds an `Arc` to it.
//!
//! ## Signals
//! ```text
//! halt()      Running ──► Halting   ⇒ halt.cancel()      + HaltRequested
//! shutdown()  halt(); Halting ──► Shutdown ⇒ shutdown.cancel() + ShutdownRequested
//! force_shutdown()  Running ──► Shutdown ⇒ halt.cancel(); shutdown.cancel()
//! ```
//! Only the winner of a transition cancels a token, so each token is cancelled
//! exactly once no matter how many callers race. The shutdown token is never
//! cancelled before the halt token.
//!
//! The one deliberate re-close is in `shutdown()`: its winner may observe
//! `Halting` before the halt winner got to cancel the halt token, so it closes
//! the halt signal itself through `close_halt` (a no-op the second
//! time). Events are still published only by transition winners.
//!
//! ## Grace deadline
//! The instant the halt signal closes is recorded once. Every bound on the main
//! routine (the listener's grace timer, the orchestrator's wait after
//! shutdown) is measured from it, so a halted routine never gets more than one
//! `termination_timeout` in total.

use std::sync::OnceLock;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::core::latch::ErrorLatch;
use crate::core::state::{AppState, StateGuard};
use crate::events::{Bus, Event, EventKind};
use crate::units::HaltSignal;

pub(crate) struct Lifecycle {
    state: StateGuard,
    halt: CancellationToken,
    halted_at: OnceLock<Instant>,
    shutdown: CancellationToken,
    pub(crate) latch: ErrorLatch,
    pub(crate) bus: Bus,
}

impl Lifecycle {
    pub(crate) fn new(bus: Bus) -> Self {
        Self {
            state: StateGuard::new(),
            halt: CancellationToken::new(),
            halted_at: OnceLock::new(),
            shutdown: CancellationToken::new(),
            latch: ErrorLatch::new(),
            bus,
        }
    }

    pub(crate) fn state(&self) -> AppState {
        self.state.current()
    }

    /// `Init → Running`; `false` if `run` was already entered.
    pub(crate) fn start(&self) -> bool {
        self.state.transition(AppState::Init, AppState::Running)
    }

    /// `Running → Halting`; no-op in any other state.
    pub(crate) fn halt(&self) {
        if self.state.transition(AppState::Running, AppState::Halting) {
            self.close_halt();
            self.bus.publish(Event::new(EventKind::HaltRequested));
        }
    }

    /// Halts, then `Halting → Shutdown`; no-op if not applicable.
    pub(crate) fn shutdown(&self) {
        self.halt();
        if self.state.transition(AppState::Halting, AppState::Shutdown) {
            self.close_halt();
            self.shutdown.cancel();
            self.bus.publish(Event::new(EventKind::ShutdownRequested));
        }
    }

    /// Jumps `Running → Shutdown` without the halt cascade.
    ///
    /// Used when resources failed to initialize and nothing was started. If a
    /// concurrent `halt()` already moved the state to `Halting`, falls back to
    /// the regular cascade.
    pub(crate) fn force_shutdown(&self) {
        if self.state.transition(AppState::Running, AppState::Shutdown) {
            self.close_halt();
            self.shutdown.cancel();
            self.bus.publish(Event::new(EventKind::ShutdownRequested));
        } else {
            self.shutdown();
        }
    }

    /// Stamps the halt instant (first caller only) and closes the halt signal.
    fn close_halt(&self) {
        self.halted_at.get_or_init(Instant::now);
        self.halt.cancel();
    }

    /// Point at which a halted main routine runs out of grace.
    ///
    /// Measured from the moment the halt signal closed (now, if it has not).
    /// `None` when the deadline is beyond what `Instant` can represent.
    pub(crate) fn grace_deadline(&self, grace: Duration) -> Option<Instant> {
        self.halted_at
            .get()
            .copied()
            .unwrap_or_else(Instant::now)
            .checked_add(grace)
    }

    pub(crate) fn halt_signal(&self) -> HaltSignal {
        HaltSignal::new(self.halt.clone())
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub(crate) async fn halted(&self) {
        self.halt.cancelled().await
    }

    pub(crate) async fn shut_down(&self) {
        self.shutdown.cancelled().await
    }

    pub(crate) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }
}
