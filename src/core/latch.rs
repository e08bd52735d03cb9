//! # First-write-wins error holder.
//!
//! [`ErrorLatch`] is shared by every actor of a run. The first recorded error
//! is kept; everything recorded afterwards is discarded. The orchestrator takes
//! the value once, after teardown, to produce the result of `run`.
//!
//! The lock covers only the "set if empty" step and is never held across an
//! `.await`.

use std::sync::Mutex;

use crate::error::AppError;

#[derive(Debug, Default)]
pub(crate) struct ErrorLatch {
    slot: Mutex<Option<AppError>>,
}

impl ErrorLatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `err` if nothing is held yet. Returns `true` if it was stored.
    pub(crate) fn record(&self, err: AppError) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        if slot.is_some() {
            return false;
        }
        *slot = Some(err);
        true
    }

    /// Records the error of `res`, ignoring `Ok`.
    pub(crate) fn record_result(&self, res: Result<(), AppError>) -> bool {
        match res {
            Ok(()) => false,
            Err(e) => self.record(e),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_set(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_some()
    }

    /// Removes and returns the held error.
    pub(crate) fn take(&self) -> Option<AppError> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner()).take()
    }
}
