//! # Run the main routine once.
//!
//! [`spawn_main`] launches the configured [`Routine`] as its own tokio task,
//! handing it the read-only [`HaltSignal`](crate::HaltSignal), and reports its
//! completion exactly once through the returned `JoinHandle`.
//!
//! ## Event flow
//! ```text
//! MainStarting → routine.run(halt) → Ok(())         → MainStopped
//!                                  → Err(e)         → MainFailed
//!                                  → panic (caught) → MainFailed
//! ```
//!
//! ## Rules
//! - No restart, no retry: one spawn per `run`.
//! - The routine is never interrupted here; bounding it is the orchestrator's job.
//! - The handle only fails with a `JoinError` when the orchestrator aborted it.

use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::core::lifecycle::Lifecycle;
use crate::error::{AppError, panic_reason};
use crate::events::{Event, EventKind};
use crate::units::RoutineRef;

/// Spawns `routine` and returns the handle reporting its result.
pub(crate) fn spawn_main(
    routine: RoutineRef,
    life: Arc<Lifecycle>,
) -> JoinHandle<Result<(), AppError>> {
    let halt = life.halt_signal();
    life.publish(Event::new(EventKind::MainStarting).with_unit(routine.name()));

    tokio::spawn(async move {
        let res = match std::panic::AssertUnwindSafe(routine.run(halt))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AppError::Main(e)),
            Err(payload) => Err(AppError::Panicked {
                unit: "main",
                reason: panic_reason(payload.as_ref()),
            }),
        };

        match &res {
            Ok(()) => life.publish(Event::new(EventKind::MainStopped).with_unit(routine.name())),
            Err(e) => life.publish(
                Event::new(EventKind::MainFailed)
                    .with_unit(routine.name())
                    .with_reason(e.to_string()),
            ),
        }
        res
    })
}
