//! # Supervised units.
//!
//! - [`Routine`] - trait for the main routine of an application
//! - [`RoutineFn`] - function-based routine implementation
//! - [`RoutineRef`] - shared reference to a routine (`Arc<dyn Routine>`)
//! - [`HaltSignal`] - read-only halt observation handle given to the routine
//! - [`Resources`] - trait for external dependencies with a background watch

mod halt;
mod resources;
mod routine;
mod routine_fn;

pub use halt::HaltSignal;
pub use resources::Resources;
pub use routine::{Routine, RoutineRef};
pub use routine_fn::RoutineFn;
