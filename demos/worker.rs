//! # Example: worker
//!
//! A worker that polls a fake queue until it is told to stop, next to a
//! connection pool whose health is watched in the background.
//!
//! Demonstrates how to:
//! - Implement [`Resources`] with a cancellable watch loop.
//! - Write the main routine with [`RoutineFn`] and honor the [`HaltSignal`].
//! - Route lifecycle events into `tracing` with [`LogWriter`].
//!
//! ## Flow
//! ```text
//! App::run()
//!     ├─► pool.init()            → ResourcesReady
//!     ├─► spawn pool.watch()
//!     ├─► spawn main (poll loop) → MainStarting
//!     │     Ctrl-C / SIGTERM     → SignalReceived, HaltRequested
//!     │     loop exits           → MainStopped
//!     ├─► shutdown               → ShutdownRequested
//!     ├─► pool.stop(), pool.release() → ResourcesReleased
//!     └─► Stopped
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example worker --features logging
//! ```
//! Press Ctrl-C to stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use appvisor::{App, AppConfig, BoxError, HaltSignal, LogWriter, Resources, RoutineFn, Subscribe};
use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Pretend connection pool.
#[derive(Default)]
struct Pool {
    pings: AtomicU64,
    stop: CancellationToken,
}

#[async_trait]
impl Resources for Pool {
    async fn init(&self, deadline: Option<Instant>) -> Result<(), BoxError> {
        tracing::info!(?deadline, "connecting pool");
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(())
    }

    async fn watch(&self) -> Result<(), BoxError> {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return Ok(()),
                _ = tick.tick() => {
                    let n = self.pings.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::debug!(n, "pool ping ok");
                }
            }
        }
    }

    fn stop(&self) {
        self.stop.cancel();
    }

    async fn release(&self) -> Result<(), BoxError> {
        tracing::info!(pings = self.pings.load(Ordering::Relaxed), "pool closed");
        Ok(())
    }

    fn name(&self) -> &str {
        "pool"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = AppConfig {
        termination_timeout: Duration::from_secs(5),
        init_timeout: Duration::from_secs(2),
        ..AppConfig::default()
    };

    let main = RoutineFn::arc("poller", |halt: HaltSignal| async move {
        let mut jobs = 0u64;
        while !halt.is_halted() {
            tokio::select! {
                _ = halt.halted() => break,
                _ = tokio::time::sleep(Duration::from_millis(500)) => {
                    jobs += 1;
                    tracing::info!(jobs, "processed job");
                }
            }
        }
        tracing::info!(jobs, "poller drained");
        Ok::<(), BoxError>(())
    });

    let app = App::builder(cfg)
        .with_main(main)
        .with_resources(Arc::new(Pool::default()))
        .with_subscribers(vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>])
        .build();

    app.run().await?;
    Ok(())
}
