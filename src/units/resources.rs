//! # Resources contract.
//!
//! [`Resources`] represents the external dependencies the main routine needs
//! (connections, pools, clients). Their health is coupled to the application:
//!
//! ```text
//! init(deadline) ──► watch() ─ ─ ─ ─ ─ ─ ─ ─► returns (any reason) ⇒ app shutdown
//!                        ▲
//!        stop() ─────────┘  (teardown asks watch to return)
//!                              then release()
//! ```

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::BoxError;

/// External dependencies supervised alongside the main routine.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio::time::Instant;
/// use tokio_util::sync::CancellationToken;
/// use appvisor::{BoxError, Resources};
///
/// struct Db {
///     stop: CancellationToken,
/// }
///
/// #[async_trait]
/// impl Resources for Db {
///     async fn init(&self, _deadline: Option<Instant>) -> Result<(), BoxError> {
///         // connect and ping
///         Ok(())
///     }
///
///     async fn watch(&self) -> Result<(), BoxError> {
///         self.stop.cancelled().await;
///         Ok(())
///     }
///
///     fn stop(&self) {
///         self.stop.cancel();
///     }
///
///     async fn release(&self) -> Result<(), BoxError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Resources: Send + Sync + 'static {
    /// Initializes resources and checks their minimum health.
    ///
    /// Runs before the main routine. `deadline` is the point after which the
    /// call is abandoned (`None` = no deadline). An error prevents the main
    /// routine from starting.
    async fn init(&self, deadline: Option<Instant>) -> Result<(), BoxError>;

    /// Monitors resource health in the background.
    ///
    /// Returning, with or without an error, immediately shuts the application down.
    async fn watch(&self) -> Result<(), BoxError>;

    /// Asks [`Resources::watch`] to return. Must not block.
    fn stop(&self);

    /// Releases resources. Called once, after `watch` has returned.
    async fn release(&self) -> Result<(), BoxError>;

    /// Returns a name used in events.
    fn name(&self) -> &str {
        "resources"
    }
}
