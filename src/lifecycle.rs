//! Application lifecycle wiring
//!
//! A [`Lifecycle`] runs registered actions when the application reaches a
//! stage. [`LoggingModule`] builds a [`Registry`] for one named application
//! context and ties its start and stop to those stages.

use crate::core::error::Result;
use crate::core::hierarchy::LoggerRepository;
use crate::management::Exporter;
use crate::registry::{Registry, RegistryConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    Start,
    Stop,
}

pub type LifecycleAction = Arc<dyn Fn() + Send + Sync>;

/// Ordered actions per stage.
///
/// # Example
///
/// ```
/// use rust_logger_registry::{Hierarchy, Lifecycle, LoggingModule, ManagementServer};
/// use std::sync::Arc;
///
/// let lifecycle = Lifecycle::new();
/// let registry = LoggingModule::new("web")
///     .install(&lifecycle, Arc::new(Hierarchy::new()), Arc::new(ManagementServer::new()))
///     .unwrap();
///
/// lifecycle.start();
/// assert!(registry.is_running());
/// lifecycle.stop();
/// assert!(!registry.is_running());
/// ```
#[derive(Default)]
pub struct Lifecycle {
    actions: Mutex<Vec<(LifecycleStage, LifecycleAction)>>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action<F>(&self, stage: LifecycleStage, action: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.lock().push((stage, Arc::new(action)));
    }

    /// Run every action registered for `stage`, in registration order.
    pub fn execute(&self, stage: LifecycleStage) {
        // Collect first so actions may register further actions
        let due: Vec<LifecycleAction> = self
            .actions
            .lock()
            .iter()
            .filter(|(registered, _)| *registered == stage)
            .map(|(_, action)| Arc::clone(action))
            .collect();

        for action in due {
            action();
        }
    }

    pub fn start(&self) {
        self.execute(LifecycleStage::Start);
    }

    pub fn stop(&self) {
        self.execute(LifecycleStage::Stop);
    }

    pub fn action_count(&self, stage: LifecycleStage) -> usize {
        self.actions
            .lock()
            .iter()
            .filter(|(registered, _)| *registered == stage)
            .count()
    }
}

/// Builds a registry for one application context.
#[derive(Debug, Clone)]
pub struct LoggingModule {
    context: String,
}

impl LoggingModule {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Default configuration qualified with this module's context.
    pub fn config(&self) -> RegistryConfig {
        RegistryConfig::for_context(self.context.as_str())
    }

    pub fn install(
        &self,
        lifecycle: &Lifecycle,
        repository: Arc<dyn LoggerRepository>,
        exporter: Arc<dyn Exporter>,
    ) -> Result<Arc<Registry>> {
        self.install_with(lifecycle, repository, exporter, self.config())
    }

    /// Like [`install`](Self::install) with explicit settings; the context
    /// label is always this module's.
    pub fn install_with(
        &self,
        lifecycle: &Lifecycle,
        repository: Arc<dyn LoggerRepository>,
        exporter: Arc<dyn Exporter>,
        mut config: RegistryConfig,
    ) -> Result<Arc<Registry>> {
        config.context = Some(self.context.clone());
        let registry = Arc::new(Registry::new(repository, exporter, config)?);

        let started = Arc::clone(&registry);
        let context = self.context.clone();
        lifecycle.add_action(LifecycleStage::Start, move || {
            if let Err(e) = started.start() {
                error!(context = %context, error = %e, "failed to start logger registry");
            }
        });

        let stopped = Arc::clone(&registry);
        lifecycle.add_action(LifecycleStage::Stop, move || stopped.stop());

        Ok(registry)
    }
}
