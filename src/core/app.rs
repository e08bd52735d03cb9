//! # App: runs the main routine, resources and signal listener as one lifecycle.
//!
//! The [`App`] owns the configuration, the optional [`Resources`], the main
//! [`Routine`](crate::Routine) and the shared lifecycle (state guard, halt and
//! shutdown signals, error latch, event bus).
//!
//! ## Run sequence
//! ```text
//! run()
//!   ├─ no main routine ───────────────────────────► Err(MainOmitted)
//!   ├─ Init ──► Running lost ─────────────────────► Err(WrongState)
//!   ├─ resources.init(deadline) ── Err ──► force Shutdown ──► Err(ResourceInit | InitTimeout)
//!   ├─ spawn watch unit
//!   ├─ register OS signals, spawn listener
//!   ├─ spawn main routine
//!   ├─ wait first of:
//!   │     ├─ main returned        → latch its error
//!   │     ├─ grace elapsed        → (listener latched TerminationTimeout)
//!   │     └─ shutdown closed      → (watch exit / App::shutdown)
//!   ├─ shutdown()                 → both signals closed
//!   ├─ bound the main routine:
//!   │     ├─ grace elapsed        → abort now
//!   │     └─ shutdown closed      → wait until halt + grace, then TerminationTimeout + abort
//!   ├─ resources: stop() → await watch exit → release()
//!   └─ return latched error (first write wins) or Ok(())
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use appvisor::{App, AppConfig, BoxError, HaltSignal, RoutineFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = AppConfig {
//!         termination_timeout: Duration::from_secs(5),
//!         ..AppConfig::default()
//!     };
//!
//!     let app = App::builder(cfg)
//!         .with_main(RoutineFn::arc("ticker", |halt: HaltSignal| async move {
//!             for _ in 0..3 {
//!                 if halt.is_halted() {
//!                     break;
//!                 }
//!                 tokio::time::sleep(Duration::from_millis(10)).await;
//!             }
//!             Ok::<(), BoxError>(())
//!         }))
//!         .build();
//!
//!     app.run().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::{JoinError, JoinHandle};
use tokio::time;

use crate::core::{
    AppConfig, AppState,
    builder::AppBuilder,
    lifecycle::Lifecycle,
    resources::ResourceSupervisor,
    runner,
    signals::{self, TerminationSignals},
};
use crate::error::AppError;
use crate::events::{Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::units::{HaltSignal, Resources, RoutineRef};

type MainHandle = JoinHandle<Result<(), AppError>>;

/// What ended the wait for the first terminal event.
enum Wake {
    Main(Result<(), AppError>),
    Listener { grace_elapsed: bool },
    Shutdown,
}

/// Lifecycle coordinator for one main routine and its resources.
pub struct App {
    cfg: AppConfig,
    main: Option<RoutineRef>,
    resources: Option<Arc<dyn Resources>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    life: Arc<Lifecycle>,
}

impl App {
    /// Returns a builder for a new application.
    pub fn builder(cfg: AppConfig) -> AppBuilder {
        AppBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: AppConfig,
        main: Option<RoutineRef>,
        resources: Option<Arc<dyn Resources>>,
        subscribers: Vec<Arc<dyn Subscribe>>,
        life: Arc<Lifecycle>,
    ) -> Self {
        Self {
            cfg,
            main,
            resources,
            subscribers,
            life,
        }
    }

    /// Runs the application until the main routine returns, the application is
    /// shut down, or the termination grace period is exceeded.
    ///
    /// Executes at most once per instance; every other call fails with
    /// [`AppError::WrongState`]. The returned error is the first one recorded by
    /// any actor of the run.
    ///
    /// With [`AppConfig::handle_signals`] set, the termination signal handlers
    /// installed here stay registered for the rest of the process: a signal
    /// arriving after `run` returned is consumed and no longer terminates the
    /// process by default. Exit the process once `run` returns, or disable
    /// signal handling and drive [`App::halt`] yourself.
    pub async fn run(&self) -> Result<(), AppError> {
        let Some(main) = self.main.clone() else {
            return Err(AppError::MainOmitted);
        };
        if !self.life.start() {
            return Err(AppError::WrongState {
                state: self.life.state(),
            });
        }

        let fanout = self.spawn_fanout();
        self.life
            .publish(Event::new(EventKind::Starting).with_unit(main.name()));

        self.drive(main).await;

        let res = match self.life.latch.take() {
            Some(err) => Err(err),
            None => Ok(()),
        };
        let mut stopped = Event::new(EventKind::Stopped);
        if let Err(e) = &res {
            stopped = stopped.with_reason(e.to_string());
        }
        self.life.publish(stopped);
        if let Some(fanout) = fanout {
            let _ = fanout.await;
        }
        res
    }

    /// Requests the main routine to wind down (`Running → Halting`).
    ///
    /// No-op unless the application is running. Safe to call any number of
    /// times from any task.
    pub fn halt(&self) {
        self.life.halt();
    }

    /// Halts, then moves to `Shutdown`, ending the run.
    ///
    /// The main routine keeps whatever is left of the termination grace period,
    /// counted from the moment it was halted. No-op if not applicable.
    pub fn shutdown(&self) {
        self.life.shutdown();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AppState {
        self.life.state()
    }

    /// Observation handle for the halt signal.
    pub fn halt_signal(&self) -> HaltSignal {
        self.life.halt_signal()
    }

    /// Returns `true` once the shutdown signal is closed.
    pub fn is_shutdown(&self) -> bool {
        self.life.is_shutdown()
    }

    /// Completes once the shutdown signal is closed.
    pub async fn wait_shutdown(&self) {
        self.life.shut_down().await
    }

    /// The configuration this application was built with.
    pub fn config(&self) -> &AppConfig {
        &self.cfg
    }

    async fn drive(&self, main: RoutineRef) {
        let resources = self
            .resources
            .as_ref()
            .map(|r| ResourceSupervisor::new(Arc::clone(r), Arc::clone(&self.life)));

        if let Some(sup) = &resources
            && let Err(e) = sup.init(self.cfg.init_deadline()).await
        {
            self.life.latch.record(e);
            self.life.force_shutdown();
            return;
        }
        let watch = resources.as_ref().map(ResourceSupervisor::spawn_watch);

        let signals = match self.register_signals() {
            Ok(signals) => signals,
            Err(e) => {
                self.life.latch.record(e);
                self.life.shutdown();
                release(resources, watch).await;
                return;
            }
        };
        let mut listener = signals::spawn_listener(
            Arc::clone(&self.life),
            signals,
            self.cfg.termination_timeout,
        );
        let mut work = runner::spawn_main(Arc::clone(&main), Arc::clone(&self.life));

        let wake = tokio::select! {
            res = &mut work => Wake::Main(joined(res)),
            res = &mut listener => Wake::Listener { grace_elapsed: matches!(res, Ok(true)) },
            _ = self.life.shut_down() => Wake::Shutdown,
        };

        self.life.shutdown();

        match wake {
            Wake::Main(res) => {
                self.life.latch.record_result(res);
                let _ = listener.await;
            }
            Wake::Listener {
                grace_elapsed: true,
            } => self.abort_main(work, main.name()).await,
            Wake::Listener {
                grace_elapsed: false,
            } => self.bound_main(work, main.name()).await,
            Wake::Shutdown => {
                let _ = listener.await;
                self.bound_main(work, main.name()).await;
            }
        }

        release(resources, watch).await;
    }

    fn register_signals(&self) -> Result<Option<TerminationSignals>, AppError> {
        if !self.cfg.handle_signals {
            return Ok(None);
        }
        TerminationSignals::register()
            .map(Some)
            .map_err(AppError::Signals)
    }

    /// Lets the main routine finish within what is left of the grace period
    /// (counted from halt), then aborts it.
    async fn bound_main(&self, mut work: MainHandle, name: &str) {
        let grace = self.cfg.termination_timeout;
        let finished = match self.life.grace_deadline(grace) {
            Some(deadline) => time::timeout_at(deadline, &mut work).await,
            None => Ok((&mut work).await),
        };
        match finished {
            Ok(res) => {
                self.life.latch.record_result(joined(res));
            }
            Err(_elapsed) => {
                self.life
                    .latch
                    .record(AppError::TerminationTimeout { timeout: grace });
                self.life
                    .publish(Event::new(EventKind::TerminationTimeout).with_timeout(grace));
                self.abort_main(work, name).await;
            }
        }
    }

    /// Aborts the main routine and waits until it is gone.
    ///
    /// A routine that finished right before the abort still gets its result latched.
    async fn abort_main(&self, work: MainHandle, name: &str) {
        work.abort();
        match work.await {
            Ok(res) => {
                self.life.latch.record_result(res);
            }
            Err(_cancelled) => self
                .life
                .publish(Event::new(EventKind::MainAborted).with_unit(name)),
        }
    }

    /// Forwards bus events to the subscribers until the final `Stopped` event.
    fn spawn_fanout(&self) -> Option<JoinHandle<()>> {
        if self.subscribers.is_empty() {
            return None;
        }
        let mut rx = self.life.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.life.bus.clone());

        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        let last = ev.kind == EventKind::Stopped;
                        set.emit(&ev);
                        if last {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event fan-out lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        }))
    }
}

async fn release(resources: Option<ResourceSupervisor>, watch: Option<JoinHandle<()>>) {
    if let (Some(sup), Some(watch)) = (resources, watch) {
        sup.teardown(watch).await;
    }
}

fn joined(res: Result<Result<(), AppError>, JoinError>) -> Result<(), AppError> {
    match res {
        Ok(res) => res,
        Err(e) => Err(AppError::Panicked {
            unit: "main",
            reason: e.to_string(),
        }),
    }
}
