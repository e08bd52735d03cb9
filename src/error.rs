//! Error types surfaced by [`App::run`](crate::App::run).
//!
//! Every concurrent actor of a run reports failure into a shared first-write-wins
//! latch; the single [`AppError`] held by that latch when the run ends is what
//! `run` returns. Errors produced by user code (routine, resources) are wrapped
//! unchanged and stay reachable through [`std::error::Error::source`].
//!
//! [`AppError`] provides helper methods (`as_label`, `as_message`) for logs and
//! events, mirroring the labels used elsewhere in the crate.

use std::time::Duration;
use thiserror::Error;

use crate::core::AppState;

/// Boxed error returned by user-supplied routines and resources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by an application run.
///
/// Grouped by origin:
/// - **Configuration**: [`AppError::MainOmitted`]
/// - **Lifecycle**: [`AppError::WrongState`]
/// - **Resources**: [`AppError::ResourceInit`], [`AppError::InitTimeout`],
///   [`AppError::ResourceWatch`], [`AppError::ResourceRelease`]
/// - **Work**: [`AppError::Main`], [`AppError::Panicked`]
/// - **Shutdown**: [`AppError::TerminationTimeout`], [`AppError::Signals`]
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AppError {
    /// No main routine was configured; nothing to run.
    #[error("main routine is omitted")]
    MainOmitted,

    /// `run` was called on an instance that is already running or finished.
    #[error("wrong application state: {state}")]
    WrongState {
        /// State observed when the call was rejected.
        state: AppState,
    },

    /// Resources failed to initialize; the main routine was never started.
    #[error("resources init failed: {0}")]
    ResourceInit(#[source] BoxError),

    /// Resources did not initialize before the initialization deadline.
    #[error("resources init timed out after {timeout:?}")]
    InitTimeout {
        /// The configured initialization timeout.
        timeout: Duration,
    },

    /// The resource watch unit exited with an error.
    #[error("resources watch failed: {0}")]
    ResourceWatch(#[source] BoxError),

    /// Releasing resources failed during teardown.
    #[error("resources release failed: {0}")]
    ResourceRelease(#[source] BoxError),

    /// The main routine returned an error.
    #[error("main routine failed: {0}")]
    Main(#[source] BoxError),

    /// A supervised unit panicked.
    #[error("{unit} panicked: {reason}")]
    Panicked {
        /// Which unit panicked (`"main"` or `"watch"`).
        unit: &'static str,
        /// Panic payload rendered as text.
        reason: String,
    },

    /// The main routine did not stop within the termination grace period.
    #[error("termination timeout {timeout:?} exceeded")]
    TerminationTimeout {
        /// The configured grace period.
        timeout: Duration,
    },

    /// Termination signal handlers could not be installed.
    #[error("failed to register termination signals: {0}")]
    Signals(#[source] std::io::Error),
}

impl AppError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use appvisor::AppError;
    /// use std::time::Duration;
    ///
    /// let err = AppError::TerminationTimeout { timeout: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "termination_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AppError::MainOmitted => "main_omitted",
            AppError::WrongState { .. } => "wrong_state",
            AppError::ResourceInit(_) => "resource_init",
            AppError::InitTimeout { .. } => "resource_init_timeout",
            AppError::ResourceWatch(_) => "resource_watch",
            AppError::ResourceRelease(_) => "resource_release",
            AppError::Main(_) => "main_failed",
            AppError::Panicked { .. } => "panicked",
            AppError::TerminationTimeout { .. } => "termination_timeout",
            AppError::Signals(_) => "signals",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            AppError::MainOmitted => "main routine is omitted".to_string(),
            AppError::WrongState { state } => format!("wrong state: {state}"),
            AppError::ResourceInit(e) => format!("init: {e}"),
            AppError::InitTimeout { timeout } => format!("init timeout: {timeout:?}"),
            AppError::ResourceWatch(e) => format!("watch: {e}"),
            AppError::ResourceRelease(e) => format!("release: {e}"),
            AppError::Main(e) => format!("main: {e}"),
            AppError::Panicked { unit, reason } => format!("panic in {unit}: {reason}"),
            AppError::TerminationTimeout { timeout } => {
                format!("termination timeout: {timeout:?}")
            }
            AppError::Signals(e) => format!("signals: {e}"),
        }
    }

    /// Returns `true` for [`AppError::TerminationTimeout`].
    pub fn is_termination_timeout(&self) -> bool {
        matches!(self, AppError::TerminationTimeout { .. })
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn test_wrapped_error_is_reachable_as_source() {
        let err = AppError::ResourceInit(Box::new(DiskError));
        let source = err.source().expect("source must be set");
        assert!(source.downcast_ref::<DiskError>().is_some());
        assert_eq!(err.to_string(), "resources init failed: disk on fire");
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(AppError::MainOmitted.as_label(), "main_omitted");
        assert_eq!(
            AppError::WrongState {
                state: AppState::Running
            }
            .as_label(),
            "wrong_state"
        );
        assert_eq!(AppError::Main(Box::new(DiskError)).as_label(), "main_failed");
    }

    #[test]
    fn test_wrong_state_mentions_state() {
        let err = AppError::WrongState {
            state: AppState::Shutdown,
        };
        assert_eq!(err.to_string(), "wrong application state: shutdown");
    }

    #[test]
    fn test_panic_reason_variants() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_reason(s.as_ref()), "static");
        let s: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_reason(s.as_ref()), "owned");
        let s: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_reason(s.as_ref()), "unknown panic");
    }
}
