//! # Main routine abstraction.
//!
//! A [`Routine`] is the main thread of execution of an [`App`](crate::App).
//! It runs once per `run`, receives a [`HaltSignal`] and should return promptly
//! once the signal fires. Its result becomes the result of `run` unless another
//! actor latched an error first.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::units::HaltSignal;

/// Shared handle to a routine.
pub type RoutineRef = Arc<dyn Routine>;

/// # Main routine of an application.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use appvisor::{BoxError, HaltSignal, Routine};
///
/// struct Server;
///
/// #[async_trait]
/// impl Routine for Server {
///     fn name(&self) -> &str { "server" }
///
///     async fn run(&self, halt: HaltSignal) -> Result<(), BoxError> {
///         halt.halted().await;
///         // drain in-flight work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Routine: Send + Sync + 'static {
    /// Returns a stable, human-readable name used in events.
    fn name(&self) -> &str;

    /// Executes the routine until completion or halt.
    async fn run(&self, halt: HaltSignal) -> Result<(), BoxError>;
}
