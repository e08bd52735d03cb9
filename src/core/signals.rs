//! # OS termination signals and the grace-period listener.
//!
//! [`TerminationSignals`] registers the process's termination signals once,
//! synchronously, so no signal delivered after `run` launched the main routine
//! can be missed. [`spawn_listener`] turns the first signal into a halt and then
//! enforces the termination grace period.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGHUP` (terminal hangup)
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal)
//!
//! **Windows platforms:**
//! - Ctrl-C, Ctrl-Break, Ctrl-Close, Ctrl-Shutdown
//!
//! Registrations cannot be undone: once `run` has installed the handlers, the
//! signals above never fall back to their default disposition in this
//! process, even after `run` returned.
//!
//! ## Listener flow
//! ```text
//! select (biased):
//!   shutdown closed ──────────────► exit (false)
//!   halt closed (any source) ──┐
//!   OS signal ─► halt() ───────┤
//!                              ▼
//! select (biased):
//!   shutdown closed ──────────────► exit (false)
//!   halt + grace elapsed ─► latch TerminationTimeout ─► exit (true)
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::lifecycle::Lifecycle;
use crate::error::AppError;
use crate::events::{Event, EventKind};

/// Registered termination signal streams.
#[cfg(unix)]
pub(crate) struct TerminationSignals {
    hangup: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    pub(crate) fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Waits for the next termination signal and returns its name.
    pub(crate) async fn recv(&mut self) -> &'static str {
        tokio::select! {
            Some(()) = self.hangup.recv() => "SIGHUP",
            Some(()) = self.interrupt.recv() => "SIGINT",
            Some(()) = self.terminate.recv() => "SIGTERM",
            Some(()) = self.quit.recv() => "SIGQUIT",
            else => std::future::pending().await,
        }
    }
}

/// Registered termination signal streams.
#[cfg(windows)]
pub(crate) struct TerminationSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
    ctrl_break: tokio::signal::windows::CtrlBreak,
    ctrl_close: tokio::signal::windows::CtrlClose,
    ctrl_shutdown: tokio::signal::windows::CtrlShutdown,
}

#[cfg(windows)]
impl TerminationSignals {
    pub(crate) fn register() -> std::io::Result<Self> {
        use tokio::signal::windows;

        Ok(Self {
            ctrl_c: windows::ctrl_c()?,
            ctrl_break: windows::ctrl_break()?,
            ctrl_close: windows::ctrl_close()?,
            ctrl_shutdown: windows::ctrl_shutdown()?,
        })
    }

    /// Waits for the next termination signal and returns its name.
    pub(crate) async fn recv(&mut self) -> &'static str {
        tokio::select! {
            Some(()) = self.ctrl_c.recv() => "CTRL_C",
            Some(()) = self.ctrl_break.recv() => "CTRL_BREAK",
            Some(()) = self.ctrl_close.recv() => "CTRL_CLOSE",
            Some(()) = self.ctrl_shutdown.recv() => "CTRL_SHUTDOWN",
            else => std::future::pending().await,
        }
    }
}

async fn next_signal(signals: &mut Option<TerminationSignals>) -> &'static str {
    match signals {
        Some(s) => s.recv().await,
        None => std::future::pending().await,
    }
}

async fn grace_elapsed(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Spawns the signal listener.
///
/// The returned handle resolves to `true` if the grace period elapsed (and a
/// [`AppError::TerminationTimeout`] was offered to the latch), `false` if the
/// run shut down first.
pub(crate) fn spawn_listener(
    life: Arc<Lifecycle>,
    mut signals: Option<TerminationSignals>,
    grace: Duration,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = life.shut_down() => return false,
            _ = life.halted() => {}
            name = next_signal(&mut signals) => {
                life.publish(Event::new(EventKind::SignalReceived).with_signal(name));
                life.halt();
            }
        }

        tokio::select! {
            biased;
            _ = life.shut_down() => false,
            _ = grace_elapsed(life.grace_deadline(grace)) => {
                life.latch.record(AppError::TerminationTimeout { timeout: grace });
                life.publish(Event::new(EventKind::TerminationTimeout).with_timeout(grace));
                true
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;

    fn running() -> Arc<Lifecycle> {
        let life = Arc::new(Lifecycle::new(Bus::new(16)));
        assert!(life.start());
        life
    }

    #[tokio::test]
    async fn test_exits_silently_when_already_shut_down() {
        let life = running();
        life.shutdown();

        let fired = spawn_listener(life.clone(), None, Duration::ZERO).await.unwrap();
        assert!(!fired);
        assert!(!life.latch.is_set());
    }

    #[tokio::test]
    async fn test_grace_elapses_after_halt() {
        let life = running();
        let listener = spawn_listener(life.clone(), None, Duration::from_millis(20));
        life.halt();

        assert!(listener.await.unwrap());
        assert!(matches!(
            life.latch.take(),
            Some(AppError::TerminationTimeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_within_grace_is_silent() {
        let life = running();
        let listener = spawn_listener(life.clone(), None, Duration::from_secs(5));
        life.halt();
        tokio::time::sleep(Duration::from_millis(10)).await;
        life.shutdown();

        assert!(!listener.await.unwrap());
        assert!(!life.latch.is_set());
    }
}
