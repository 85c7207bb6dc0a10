//! Registry that mirrors a logger hierarchy into managed objects
//!
//! A dedicated worker thread wakes every scan interval and runs a
//! reconciliation pass:
//!
//! 1. bump the generation counter,
//! 2. create or refresh a [`LoggerHandle`] for every logger the repository
//!    reports, stamping it with the new generation,
//! 3. retire every handle still carrying an older generation.
//!
//! Loggers have no removal notification, so absence from a full enumeration
//! is the only signal that one is gone.

use super::config::RegistryConfig;
use super::handle::{LoggerHandle, ROOT_LOGGER_KEY};
use crate::core::error::{RegistryError, Result};
use crate::core::hierarchy::LoggerRepository;
use crate::core::metrics::RegistryMetrics;
use crate::management::{Attribute, Exporter, ManagedObject, ObjectName};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Leading name segments kept together as the first path component.
///
/// Most names start with an organisation prefix such as `com.example` or
/// `org.acme`, which reads best as a single tree node.
pub const PRESERVE_PACKAGES: usize = 2;

/// Name of the reconciliation worker thread.
pub const WORKER_THREAD_NAME: &str = "logger-registry";

const ATTRIBUTES: &[Attribute] = &[
    Attribute::read_only("loggerNames"),
    Attribute::read_only("generation"),
    Attribute::read_only("passes"),
    Attribute::read_only("exportFailures"),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ExportKey {
    Registry,
    Root,
    Logger(String),
}

/// State shared between the registry, its worker and the management server.
struct Shared {
    repository: Arc<dyn LoggerRepository>,
    exporter: Arc<dyn Exporter>,
    root_name: ObjectName,
    root: Arc<LoggerHandle>,
    generation: AtomicU64,
    handles: RwLock<BTreeMap<String, Arc<LoggerHandle>>>,
    exported: Mutex<HashMap<ExportKey, ObjectName>>,
    // Serializes passes so the generation has a single writer
    scan: Mutex<()>,
    metrics: RegistryMetrics,
}

impl Shared {
    fn object_name_for(&self, logger: &str) -> Result<ObjectName> {
        let pieces: Vec<&str> = logger.split('.').filter(|piece| !piece.is_empty()).collect();

        let mut name = format!("{},logger=", self.root_name);
        if pieces.len() < PRESERVE_PACKAGES {
            name.push_str(logger);
        } else {
            name.push_str(&pieces[..PRESERVE_PACKAGES].join("."));
            for (idx, piece) in pieces.iter().enumerate().skip(PRESERVE_PACKAGES) {
                let _ = write!(name, ",logger{}={}", idx, piece);
            }
        }
        ObjectName::new(name)
    }

    fn locate_handle(&self, name: &str) -> Arc<LoggerHandle> {
        let current = self.generation.load(Ordering::Acquire);

        if let Some(handle) = self.handles.read().get(name) {
            handle.set_generation(current);
            return Arc::clone(handle);
        }

        trace!(logger = name, "no handle for logger, creating");
        let handle = Arc::new(LoggerHandle::new(
            name,
            Arc::clone(&self.repository),
            current,
        ));
        match self.object_name_for(name) {
            Ok(object_name) => {
                self.export(ExportKey::Logger(name.to_string()), object_name, handle.clone())
            }
            Err(e) => {
                warn!(logger = name, error = %e, "cannot build object name for logger");
                self.metrics.record_export_failure();
            }
        }

        self.handles
            .write()
            .insert(name.to_string(), Arc::clone(&handle));
        self.metrics.record_created();
        handle
    }

    fn reconcile(&self) -> u64 {
        let _scan = self.scan.lock();
        let current = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        for name in self.repository.current_loggers() {
            self.locate_handle(&name);
        }

        // Anything not stamped above belongs to a logger that is gone
        let stale: Vec<String> = self
            .handles
            .read()
            .values()
            .filter(|handle| handle.generation() < current)
            .map(|handle| handle.name().to_string())
            .collect();

        if !stale.is_empty() {
            let mut handles = self.handles.write();
            for name in &stale {
                handles.remove(name);
            }
        }
        for name in stale {
            trace!(logger = %name, "logger no longer active, removing");
            self.unexport(&ExportKey::Logger(name));
            self.metrics.record_retired();
        }

        self.metrics.record_pass();
        current
    }

    fn export(&self, key: ExportKey, name: ObjectName, object: Arc<dyn ManagedObject>) {
        let mut exported = self.exported.lock();
        match self.exporter.export(&name, object) {
            Ok(()) => {
                exported.insert(key, name);
            }
            Err(e) if e.is_collision() => {
                warn!(object_name = %name, "could not export, already exists");
                self.metrics.record_export_failure();
            }
            Err(e) => {
                warn!(object_name = %name, error = %e, "could not export");
                self.metrics.record_export_failure();
            }
        }
    }

    fn unexport(&self, key: &ExportKey) {
        let mut exported = self.exported.lock();
        if let Some(name) = exported.remove(key) {
            self.unexport_name(&name);
        }
    }

    fn unexport_all(&self) {
        let mut exported = self.exported.lock();
        for (_, name) in exported.drain() {
            self.unexport_name(&name);
        }
    }

    fn unexport_name(&self, name: &ObjectName) {
        if let Err(e) = self.exporter.unexport(name) {
            warn!(object_name = %name, error = %e, "could not unexport");
            self.metrics.record_unexport_failure();
        }
    }

    /// Forget every tracked handle, counting each one as retired.
    fn retire_all(&self) {
        let retired = std::mem::take(&mut *self.handles.write());
        self.metrics.record_retired_many(retired.len() as u64);
    }

    fn logger_names(&self) -> BTreeSet<String> {
        self.handles.read().keys().cloned().collect()
    }
}

impl ManagedObject for Shared {
    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn get_attribute(&self, name: &str) -> Result<Value> {
        match name {
            "loggerNames" => Ok(Value::from(
                self.logger_names().into_iter().collect::<Vec<_>>(),
            )),
            "generation" => Ok(Value::from(self.generation.load(Ordering::Acquire))),
            "passes" => Ok(Value::from(self.metrics.passes())),
            "exportFailures" => Ok(Value::from(self.metrics.export_failures())),
            _ => Err(RegistryError::unknown_attribute(name)),
        }
    }

    fn set_attribute(&self, name: &str, _value: Value) -> Result<()> {
        if ATTRIBUTES.iter().any(|attribute| attribute.name == name) {
            Err(RegistryError::read_only(name))
        } else {
            Err(RegistryError::unknown_attribute(name))
        }
    }
}

/// Running reconciliation worker.
struct Worker {
    stop: Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl Worker {
    fn spawn(shared: Arc<Shared>, interval: Duration) -> std::io::Result<Self> {
        let (stop, stopped) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                loop {
                    // The timeout is the sleep; a message or a dropped sender ends the loop
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let pass = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        shared.reconcile()
                    }));
                    match pass {
                        Ok(generation) => trace!(generation, "reconciliation pass complete"),
                        Err(panic_info) => {
                            shared.metrics.record_panicked_pass();
                            error!(
                                panic = %panic_message(&panic_info),
                                "reconciliation pass panicked"
                            );
                        }
                    }
                }
                debug!("reconciliation worker exiting");
            })?;

        Ok(Self { stop, handle })
    }

    /// Signal the worker and wait until it has exited.
    fn terminate(self) {
        let _ = self.stop.send(());
        if let Err(panic_info) = self.handle.join() {
            error!(
                panic = %panic_message(&panic_info),
                "reconciliation worker panicked during shutdown"
            );
        }
    }
}

fn panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Mirrors every logger of a [`LoggerRepository`] as a managed object.
///
/// # Example
///
/// ```
/// use rust_logger_registry::{Hierarchy, ManagementServer, Registry};
/// use std::sync::Arc;
///
/// let hierarchy = Arc::new(Hierarchy::new());
/// hierarchy.logger("com.example.db.pool");
///
/// let registry = Registry::builder()
///     .repository(hierarchy.clone())
///     .exporter(Arc::new(ManagementServer::new()))
///     .context("api")
///     .build()
///     .unwrap();
///
/// registry.start().unwrap();
/// assert!(registry.logger_names().contains("com.example.db.pool"));
/// assert_eq!(
///     registry.object_name_for("com.example.db.pool").unwrap().as_str(),
///     "rust_logger_registry:name=Logger,context=api,logger=com.example,logger2=db,logger3=pool"
/// );
/// registry.stop();
/// assert!(registry.logger_names().is_empty());
/// ```
pub struct Registry {
    shared: Arc<Shared>,
    scan_interval: Duration,
    worker: Mutex<Option<Worker>>,
}

impl Registry {
    pub fn new(
        repository: Arc<dyn LoggerRepository>,
        exporter: Arc<dyn Exporter>,
        config: RegistryConfig,
    ) -> Result<Self> {
        config.validate()?;
        let root_name = config.root_object_name()?;
        let root = Arc::new(LoggerHandle::new(
            repository.root_name(),
            Arc::clone(&repository),
            0,
        ));

        Ok(Self {
            shared: Arc::new(Shared {
                repository,
                exporter,
                root_name,
                root,
                generation: AtomicU64::new(0),
                handles: RwLock::new(BTreeMap::new()),
                exported: Mutex::new(HashMap::new()),
                scan: Mutex::new(()),
                metrics: RegistryMetrics::new(),
            }),
            scan_interval: config.scan_interval(),
            worker: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Export the registry and the root logger, run a first pass and launch
    /// the worker.
    ///
    /// A second call while running logs a warning and does nothing. The only
    /// error is a failure to spawn the worker thread, in which case everything
    /// exported here is withdrawn again.
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            warn!(object_name = %self.shared.root_name, "ignoring multiple start attempts");
            return Ok(());
        }

        let shared = &self.shared;
        shared.export(
            ExportKey::Registry,
            shared.root_name.clone(),
            Arc::clone(shared) as Arc<dyn ManagedObject>,
        );
        match shared.object_name_for(ROOT_LOGGER_KEY) {
            Ok(name) => shared.export(ExportKey::Root, name, shared.root.clone()),
            Err(e) => {
                warn!(error = %e, "cannot build object name for root logger");
                shared.metrics.record_export_failure();
            }
        }

        let generation = shared.reconcile();

        match Worker::spawn(Arc::clone(shared), self.scan_interval) {
            Ok(spawned) => {
                *worker = Some(spawned);
                info!(
                    object_name = %shared.root_name,
                    generation,
                    loggers = shared.handles.read().len(),
                    "logger registry started"
                );
                Ok(())
            }
            Err(e) => {
                shared.retire_all();
                shared.unexport_all();
                Err(RegistryError::WorkerSpawn(e))
            }
        }
    }

    /// Stop the worker, forget all handles and withdraw every export.
    ///
    /// Blocks until the worker has exited. Does nothing when not running.
    pub fn stop(&self) {
        let mut worker = self.worker.lock();
        if let Some(running) = worker.take() {
            running.terminate();
            self.shared.retire_all();
            self.shared.unexport_all();
            info!(object_name = %self.shared.root_name, "logger registry stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Run a reconciliation pass now, returning its generation.
    ///
    /// Returns `None` when the registry is not running.
    pub fn reconcile(&self) -> Option<u64> {
        let worker = self.worker.lock();
        worker.as_ref().map(|_| self.shared.reconcile())
    }

    /// Names of all tracked loggers, the root excluded.
    pub fn logger_names(&self) -> BTreeSet<String> {
        self.shared.logger_names()
    }

    pub fn handle(&self, name: &str) -> Option<Arc<LoggerHandle>> {
        self.shared.handles.read().get(name).cloned()
    }

    /// Handle for the repository's root logger. It is never tracked or retired.
    pub fn root_handle(&self) -> Arc<LoggerHandle> {
        Arc::clone(&self.shared.root)
    }

    /// Generation of the most recent pass, `0` before the first one.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    pub fn metrics(&self) -> &RegistryMetrics {
        &self.shared.metrics
    }

    pub fn root_object_name(&self) -> &ObjectName {
        &self.shared.root_name
    }

    /// Name a logger is exported under.
    ///
    /// Segment values are inserted as-is. A logger name holding `,` or `=`
    /// yields extra key properties, and one that breaks the `key=value` shape
    /// is rejected with [`RegistryError::InvalidObjectName`].
    pub fn object_name_for(&self, logger: &str) -> Result<ObjectName> {
        self.shared.object_name_for(logger)
    }

    /// Names this registry currently has exported, sorted.
    pub fn exported_names(&self) -> Vec<ObjectName> {
        let mut names: Vec<ObjectName> = self.shared.exported.lock().values().cloned().collect();
        names.sort();
        names
    }

    #[cfg(test)]
    pub(crate) fn locate_handle(&self, name: &str) -> Arc<LoggerHandle> {
        self.shared.locate_handle(name)
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Builder for constructing a [`Registry`] with a fluent API
pub struct RegistryBuilder {
    repository: Option<Arc<dyn LoggerRepository>>,
    exporter: Option<Arc<dyn Exporter>>,
    config: RegistryConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            exporter: None,
            config: RegistryConfig::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn repository(mut self, repository: Arc<dyn LoggerRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn object_name(mut self, object_name: impl Into<String>) -> Self {
        self.config.object_name = object_name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.config.context = Some(context.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn scan_interval(mut self, interval: Duration) -> Self {
        self.config.set_scan_interval(interval);
        self
    }

    pub fn build(self) -> Result<Registry> {
        let repository = self
            .repository
            .ok_or_else(|| RegistryError::config("Registry", "a logger repository is required"))?;
        let exporter = self
            .exporter
            .ok_or_else(|| RegistryError::config("Registry", "an exporter is required"))?;
        Registry::new(repository, exporter, self.config)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
