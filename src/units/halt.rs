//! # Read-only view of the halt signal.
//!
//! The main routine receives a [`HaltSignal`] and is expected to wind down
//! once it fires. The handle can only observe; closing the signal is reserved
//! to the application's `Running → Halting` transition.

use tokio_util::sync::CancellationToken;

/// Observation handle for the halt signal of an [`App`](crate::App).
///
/// Cheap to clone; every clone observes the same signal.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use appvisor::HaltSignal;
///
/// async fn pump(halt: HaltSignal) {
///     loop {
///         tokio::select! {
///             _ = halt.halted() => break,
///             _ = tokio::time::sleep(Duration::from_millis(100)) => { /* one unit of work */ }
///         }
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct HaltSignal {
    token: CancellationToken,
}

impl HaltSignal {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Returns `true` once halt has been requested.
    pub fn is_halted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when halt is requested (immediately if it already was).
    pub async fn halted(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_observes_cancellation() {
        let token = CancellationToken::new();
        let halt = HaltSignal::new(token.clone());
        let copy = halt.clone();
        assert!(!halt.is_halted());

        token.cancel();
        copy.halted().await;
        assert!(halt.is_halted());
    }
}
