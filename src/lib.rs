//! # appvisor
//!
//! **Appvisor** is a lifecycle coordinator for a single async application.
//!
//! It runs one main routine next to an optional set of resources, listens
//! for OS termination signals, and turns whatever stops first into one
//! orderly, bounded shutdown with a single first-recorded error.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Resources   │   │   Routine    │   │  OS signals  │
//!     │ init / watch │   │ (main, once) │   │ HUP INT TERM │
//!     │ stop/release │   │              │   │     QUIT     │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  App (run orchestrator)                                           │
//! │  - StateGuard  Init → Running → Halting → Shutdown                │
//! │  - halt / shutdown signals (closed once, never reopened)          │
//! │  - ErrorLatch  (first error wins)                                 │
//! │  - Bus         (broadcast lifecycle events)                       │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                  (capacity: AppConfig::bus_capacity)              │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                            (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                     sub1.on   sub2.on   subN.on
//!                     _event()  _event()  _event()
//! ```
//!
//! ### Shutdown cascade
//! ```text
//! OS signal ─┐
//! halt()    ─┼─► halt closed ──► routine winds down ──► routine returns ──► shutdown closed
//! watch exit ┘        │                                                          ▲
//!                     └──── termination_timeout elapsed ─► TerminationTimeout ───┘
//!
//! shutdown closed ──► resources.stop() ──► watch exits ──► resources.release() ──► run returns
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                     |
//! |-------------------|-----------------------------------------------------------------|----------------------------------------|
//! | **Lifecycle**     | Run, halt and shut down one application instance.               | [`App`], [`AppState`]                  |
//! | **Units**         | Main routine and supervised resources.                          | [`Routine`], [`RoutineFn`], [`Resources`] |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom).          | [`Subscribe`], [`Event`]               |
//! | **Errors**        | Typed errors for every way a run can end.                       | [`AppError`]                           |
//! | **Configuration** | Grace period, init deadline, signal handling.                   | [`AppConfig`]                          |
//!
//! ## Signals
//! With [`AppConfig::handle_signals`] (the default), `run` installs handlers
//! for HUP, INT, TERM and QUIT (Ctrl-C/Break/Close/Shutdown on Windows). They
//! cannot be removed again: after `run` returns, those signals no longer kill
//! the process by default, so exit once `run` is done.
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber backed by `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use appvisor::{App, AppConfig, BoxError, HaltSignal, RoutineFn, RoutineRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = AppConfig {
//!         termination_timeout: Duration::from_secs(5),
//!         ..AppConfig::default()
//!     };
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn appvisor::Subscribe>> = vec![Arc::new(appvisor::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn appvisor::Subscribe>> = Vec::new();
//!
//!     // Main routine: works until halted
//!     let main: RoutineRef = RoutineFn::arc("hello", |halt: HaltSignal| async move {
//!         if halt.is_halted() {
//!             return Ok(());
//!         }
//!         println!("Hello from main!");
//!         Ok::<(), BoxError>(())
//!     });
//!
//!     let app = App::builder(cfg)
//!         .with_main(main)
//!         .with_subscribers(subs)
//!         .build();
//!
//!     app.run().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;
mod units;

// ---- Public re-exports ----

pub use core::{App, AppBuilder, AppConfig, AppState};
pub use error::{AppError, BoxError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use units::{HaltSignal, Resources, Routine, RoutineFn, RoutineRef};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
