//! Runtime core: lifecycle state and run orchestration.
//!
//! The only public API from this module is [`App`] (with its [`AppBuilder`],
//! [`AppConfig`] and [`AppState`]), which coordinates one main routine, its
//! resources and OS termination signals.
//!
//! Internal modules:
//! - [`state`]: four-state guard with compare-and-set transitions;
//! - [`latch`]: first-write-wins error slot;
//! - [`lifecycle`]: shared state, halt/shutdown signals, latch and bus;
//! - [`resources`]: init/watch/stop/release supervision;
//! - [`signals`]: OS signal listener and termination grace timer;
//! - [`runner`]: spawns the main routine once with panic isolation;
//! - [`app`]: the run orchestrator.

mod app;
mod builder;
mod config;
mod latch;
mod lifecycle;
mod resources;
mod runner;
mod signals;
mod state;

pub use app::App;
pub use builder::AppBuilder;
pub use config::AppConfig;
pub use state::AppState;
