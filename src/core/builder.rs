use std::sync::Arc;

use crate::{
    core::{AppConfig, app::App, lifecycle::Lifecycle},
    events::Bus,
    subscribers::Subscribe,
    units::{Resources, RoutineRef},
};

/// Builder for constructing an [`App`].
///
/// Everything set here is frozen by [`AppBuilder::build`]; a built application
/// cannot be reconfigured.
pub struct AppBuilder {
    cfg: AppConfig,
    main: Option<RoutineRef>,
    resources: Option<Arc<dyn Resources>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl AppBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: AppConfig) -> Self {
        Self {
            cfg,
            main: None,
            resources: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the main routine. Without one, `run` fails with
    /// [`AppError::MainOmitted`](crate::AppError::MainOmitted).
    pub fn with_main(mut self, main: RoutineRef) -> Self {
        self.main = Some(main);
        self
    }

    /// Sets the resources supervised alongside the main routine.
    pub fn with_resources(mut self, resources: Arc<dyn Resources>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Sets lifecycle event subscribers.
    ///
    /// Subscribers receive every event of a run through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the application. No task is spawned until [`App::run`].
    pub fn build(self) -> Arc<App> {
        let life = Arc::new(Lifecycle::new(Bus::new(self.cfg.bus_capacity_clamped())));
        Arc::new(App::new_internal(
            self.cfg,
            self.main,
            self.resources,
            self.subscribers,
            life,
        ))
    }
}
