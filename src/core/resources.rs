//! # Resource supervision.
//!
//! [`ResourceSupervisor`] couples a user [`Resources`] implementation to the
//! application lifecycle:
//!
//! ```text
//! init(deadline) ── Err / deadline ──► latch, force shutdown, nothing starts
//!       │ Ok
//!       ▼
//! spawn_watch() ── watch returns (Ok, Err or panic) ──► latch error, shutdown()
//!       ⋮
//! teardown():  stop() ──► await watch task exit ──► release() ── Err ──► latch
//! ```
//!
//! `release` is strictly ordered after the watch task has exited, so resources
//! are never used by `watch` once released.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::core::lifecycle::Lifecycle;
use crate::error::{AppError, panic_reason};
use crate::events::{Event, EventKind};
use crate::units::Resources;

pub(crate) struct ResourceSupervisor {
    resources: Arc<dyn Resources>,
    life: Arc<Lifecycle>,
}

impl ResourceSupervisor {
    pub(crate) fn new(resources: Arc<dyn Resources>, life: Arc<Lifecycle>) -> Self {
        Self { resources, life }
    }

    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_unit(self.resources.name())
    }

    /// Initializes resources, bounded by `timeout` when set.
    ///
    /// A timeout too large to form a deadline is treated as no deadline.
    pub(crate) async fn init(&self, timeout: Option<Duration>) -> Result<(), AppError> {
        let bounded = timeout.and_then(|t| Instant::now().checked_add(t).map(|d| (t, d)));
        let res = match bounded {
            Some((timeout, deadline)) => {
                match time::timeout_at(deadline, self.resources.init(Some(deadline))).await {
                    Ok(r) => r.map_err(AppError::ResourceInit),
                    Err(_elapsed) => Err(AppError::InitTimeout { timeout }),
                }
            }
            None => self
                .resources
                .init(None)
                .await
                .map_err(AppError::ResourceInit),
        };

        match &res {
            Ok(()) => self.life.publish(self.event(EventKind::ResourcesReady)),
            Err(e) => self.life.publish(
                self.event(EventKind::ResourcesInitFailed)
                    .with_reason(e.to_string()),
            ),
        }
        res
    }

    /// Spawns the watch unit. Its exit, for any reason, shuts the application down.
    pub(crate) fn spawn_watch(&self) -> JoinHandle<()> {
        let resources = Arc::clone(&self.resources);
        let life = Arc::clone(&self.life);

        tokio::spawn(async move {
            let res = match std::panic::AssertUnwindSafe(resources.watch())
                .catch_unwind()
                .await
            {
                Ok(r) => r.map_err(AppError::ResourceWatch),
                Err(payload) => Err(AppError::Panicked {
                    unit: "watch",
                    reason: panic_reason(payload.as_ref()),
                }),
            };

            let mut ev = Event::new(EventKind::WatchExited).with_unit(resources.name());
            if let Err(e) = &res {
                ev = ev.with_reason(e.to_string());
            }
            life.publish(ev);

            life.latch.record_result(res);
            life.shutdown();
        })
    }

    /// Stops the watch unit, waits for it to exit, then releases resources.
    pub(crate) async fn teardown(&self, watch: JoinHandle<()>) {
        self.life.publish(self.event(EventKind::ResourcesStopping));
        self.resources.stop();
        let _ = watch.await;

        match self.resources.release().await {
            Ok(()) => self.life.publish(self.event(EventKind::ResourcesReleased)),
            Err(e) => {
                let err = AppError::ResourceRelease(e);
                self.life.publish(
                    self.event(EventKind::ReleaseFailed)
                        .with_reason(err.to_string()),
                );
                self.life.latch.record(err);
            }
        }
    }
}
