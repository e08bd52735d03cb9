//! # Application configuration.
//!
//! [`AppConfig`] holds the timing and plumbing settings of an [`App`](crate::App).
//! It is consumed by [`App::builder`](crate::App::builder) and immutable once the
//! application is built.
//!
//! ## Sentinel values
//! - `init_timeout = 0s` → no initialization deadline
//! - `termination_timeout = 0s` → no grace at all: a halt times out immediately

use std::time::Duration;

/// Configuration for an application run.
///
/// ## Field semantics
/// - `termination_timeout`: how long the main routine may take to return after halt
/// - `init_timeout`: deadline for [`Resources::init`](crate::Resources::init) (`0s` = none)
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `handle_signals`: whether OS termination signals trigger halt
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Grace period between halt and a [`TerminationTimeout`](crate::AppError::TerminationTimeout).
    ///
    /// Starts when the halt signal closes, whatever closed it (OS signal,
    /// [`App::halt`](crate::App::halt), resource failure).
    pub termination_timeout: Duration,

    /// Maximum time allowed for resources to initialize.
    ///
    /// Values too large to form a deadline (e.g. `Duration::MAX`) also mean none.
    pub init_timeout: Duration,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Subscribers lagging behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,

    /// Install handlers for termination signals during `run`.
    ///
    /// The handlers stay installed for the life of the process.
    ///
    /// With `false`, only explicit [`App::halt`](crate::App::halt) /
    /// [`App::shutdown`](crate::App::shutdown) calls and resource failures stop the run.
    pub handle_signals: bool,
}

impl AppConfig {
    /// Returns the initialization deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → init is abandoned after `d`
    #[inline]
    pub fn init_deadline(&self) -> Option<Duration> {
        if self.init_timeout == Duration::ZERO {
            None
        } else {
            Some(self.init_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for AppConfig {
    /// Default configuration:
    ///
    /// - `termination_timeout = 30s`
    /// - `init_timeout = 30s`
    /// - `bus_capacity = 1024`
    /// - `handle_signals = true`
    fn default() -> Self {
        Self {
            termination_timeout: Duration::from_secs(30),
            init_timeout: Duration::from_secs(30),
            bus_capacity: 1024,
            handle_signals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_init_timeout_means_no_deadline() {
        let cfg = AppConfig {
            init_timeout: Duration::ZERO,
            ..AppConfig::default()
        };
        assert_eq!(cfg.init_deadline(), None);
        assert_eq!(
            AppConfig::default().init_deadline(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_bus_capacity_is_clamped() {
        let cfg = AppConfig {
            bus_capacity: 0,
            ..AppConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
