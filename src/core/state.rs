//! # Lifecycle state machine.
//!
//! [`StateGuard`] holds the single [`AppState`] of an application and only
//! exposes guarded compare-and-set transitions. Every higher-level operation
//! (`run` entry, halt, shutdown) is a transition; whoever wins the CAS performs
//! the side effect attached to it, so each side effect happens at most once.
//!
//! ```text
//! Init ──► Running ──► Halting ──► Shutdown
//!             └──────────────────────▲   (resource init failure only)
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AppState {
    /// Built, `run` not yet entered.
    Init = 0,
    /// `run` entered; main routine and resources are live.
    Running = 1,
    /// Halt requested; the main routine should wind down.
    Halting = 2,
    /// Terminal; both halt and shutdown signals are closed.
    Shutdown = 3,
}

impl AppState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => AppState::Init,
            1 => AppState::Running,
            2 => AppState::Halting,
            _ => AppState::Shutdown,
        }
    }

    /// Returns a short stable label (snake_case).
    pub fn as_label(&self) -> &'static str {
        match self {
            AppState::Init => "init",
            AppState::Running => "running",
            AppState::Halting => "halting",
            AppState::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Atomic holder of [`AppState`] with compare-and-set transitions only.
#[derive(Debug)]
pub(crate) struct StateGuard {
    state: AtomicU8,
}

impl StateGuard {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicU8::new(AppState::Init as u8),
        }
    }

    /// Moves `from → to` if the current state is `from`.
    ///
    /// Returns `true` for exactly one of any number of racing callers.
    pub(crate) fn transition(&self, from: AppState, to: AppState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Snapshot of the current state.
    pub(crate) fn current(&self) -> AppState {
        AppState::from_u8(self.state.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_starts_in_init() {
        assert_eq!(StateGuard::new().current(), AppState::Init);
    }

    #[test]
    fn test_transitions_follow_order() {
        let g = StateGuard::new();
        assert!(!g.transition(AppState::Running, AppState::Halting));
        assert!(g.transition(AppState::Init, AppState::Running));
        assert!(!g.transition(AppState::Init, AppState::Running));
        assert!(g.transition(AppState::Running, AppState::Halting));
        assert!(g.transition(AppState::Halting, AppState::Shutdown));
        assert!(!g.transition(AppState::Halting, AppState::Shutdown));
        assert_eq!(g.current(), AppState::Shutdown);
    }

    #[test]
    fn test_concurrent_transition_has_single_winner() {
        let g = Arc::new(StateGuard::new());
        let wins = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let g = Arc::clone(&g);
                let wins = Arc::clone(&wins);
                std::thread::spawn(move || {
                    if g.transition(AppState::Init, AppState::Running) {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert_eq!(g.current(), AppState::Running);
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(AppState::Halting.to_string(), "halting");
    }
}
