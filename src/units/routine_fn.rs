//! # Function-backed routine (`RoutineFn`)
//!
//! [`RoutineFn`] wraps a closure `F: Fn(HaltSignal) -> Fut` so a plain async
//! block can serve as the main routine.
//!
//! ## Example
//! ```rust
//! use appvisor::{BoxError, HaltSignal, RoutineFn, RoutineRef};
//!
//! let main: RoutineRef = RoutineFn::arc("worker", |halt: HaltSignal| async move {
//!     halt.halted().await;
//!     Ok::<_, BoxError>(())
//! });
//!
//! assert_eq!(main.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::units::{HaltSignal, Routine};

/// Function-backed routine implementation.
#[derive(Debug)]
pub struct RoutineFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> RoutineFn<F> {
    /// Creates a new function-backed routine.
    ///
    /// Prefer [`RoutineFn::arc`] when you immediately need a [`RoutineRef`](crate::RoutineRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the routine and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Routine for RoutineFn<F>
where
    F: Fn(HaltSignal) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, halt: HaltSignal) -> Result<(), BoxError> {
        (self.f)(halt).await
    }
}
