//! Hierarchical logger table
//!
//! [`LoggerRepository`] is the narrow capability the registry needs from a
//! logging framework: enumerate loggers, read and write explicit levels, and
//! resolve effective levels and parents. [`Hierarchy`] is an in-process
//! implementation with dotted names and level inheritance.

use super::level::Level;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name under which [`Hierarchy`] reports its root logger.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Access to a framework's logger table.
///
/// Implementations must be safe to call from any thread; the registry reads
/// from its worker thread while management callers write levels concurrently.
pub trait LoggerRepository: Send + Sync {
    /// Name of the root logger.
    fn root_name(&self) -> &str;

    /// Every logger currently known, excluding the root.
    fn current_loggers(&self) -> Vec<String>;

    /// Explicit level of a logger, `None` when it inherits.
    fn level(&self, name: &str) -> Option<Level>;

    /// Set or clear (`None`) the explicit level of a logger.
    fn set_level(&self, name: &str, level: Option<Level>);

    /// Level in force after inheritance, `None` only if nothing up the chain has one.
    fn effective_level(&self, name: &str) -> Option<Level>;

    /// Name of the parent logger, `None` for the root.
    fn parent(&self, name: &str) -> Option<String>;
}

/// A single named logger.
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: RwLock<Option<Level>>,
}

impl Logger {
    fn new(name: impl Into<String>, level: Option<Level>) -> Self {
        Self {
            name: name.into(),
            level: RwLock::new(level),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Option<Level> {
        *self.level.read()
    }

    pub fn set_level(&self, level: Option<Level>) {
        *self.level.write() = level;
    }
}

/// Dotted-name logger hierarchy.
///
/// Loggers are created on first lookup and live until removed. A logger's
/// parent is its nearest existing ancestor, falling back to the root.
///
/// # Example
///
/// ```
/// use rust_logger_registry::{Hierarchy, Level, LoggerRepository};
///
/// let hierarchy = Hierarchy::new();
/// hierarchy.logger("com.example").set_level(Some(Level::WARN));
/// hierarchy.logger("com.example.db.pool");
///
/// assert_eq!(hierarchy.effective_level("com.example.db.pool"), Some(Level::WARN));
/// assert_eq!(hierarchy.parent("com.example.db.pool").as_deref(), Some("com.example"));
/// ```
#[derive(Debug)]
pub struct Hierarchy {
    root: Arc<Logger>,
    loggers: RwLock<BTreeMap<String, Arc<Logger>>>,
}

impl Hierarchy {
    /// New hierarchy whose root logs at `DEBUG`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root_level(Some(Level::DEBUG))
    }

    #[must_use]
    pub fn with_root_level(level: Option<Level>) -> Self {
        Self {
            root: Arc::new(Logger::new(ROOT_LOGGER_NAME, level)),
            loggers: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Look up a logger, creating it if needed. The empty name and the root
    /// name both resolve to the root logger.
    pub fn logger(&self, name: &str) -> Arc<Logger> {
        if self.is_root(name) {
            return self.root();
        }
        if let Some(logger) = self.loggers.read().get(name) {
            return Arc::clone(logger);
        }
        let mut loggers = self.loggers.write();
        Arc::clone(
            loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::new(name, None))),
        )
    }

    pub fn exists(&self, name: &str) -> bool {
        self.is_root(name) || self.loggers.read().contains_key(name)
    }

    /// Drop a logger from the table. The root cannot be removed.
    pub fn remove(&self, name: &str) -> bool {
        self.loggers.write().remove(name).is_some()
    }

    /// Drop every logger except the root.
    pub fn clear(&self) {
        self.loggers.write().clear();
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    fn is_root(&self, name: &str) -> bool {
        name.is_empty() || name == self.root.name()
    }

    fn find(&self, name: &str) -> Option<Arc<Logger>> {
        if self.is_root(name) {
            return Some(self.root());
        }
        self.loggers.read().get(name).cloned()
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

/// Proper ancestors of a dotted name, nearest first.
fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    let mut rest = name;
    std::iter::from_fn(move || {
        let idx = rest.rfind('.')?;
        rest = &rest[..idx];
        Some(rest)
    })
    .filter(|ancestor| !ancestor.is_empty())
}

impl LoggerRepository for Hierarchy {
    fn root_name(&self) -> &str {
        self.root.name()
    }

    fn current_loggers(&self) -> Vec<String> {
        self.loggers.read().keys().cloned().collect()
    }

    fn level(&self, name: &str) -> Option<Level> {
        self.find(name).and_then(|logger| logger.level())
    }

    fn set_level(&self, name: &str, level: Option<Level>) {
        self.logger(name).set_level(level);
    }

    fn effective_level(&self, name: &str) -> Option<Level> {
        if self.is_root(name) {
            return self.root.level();
        }
        if let Some(level) = self.level(name) {
            return Some(level);
        }
        let loggers = self.loggers.read();
        ancestors(name)
            .find_map(|ancestor| loggers.get(ancestor).and_then(|logger| logger.level()))
            .or_else(|| self.root.level())
    }

    fn parent(&self, name: &str) -> Option<String> {
        if self.is_root(name) {
            return None;
        }
        let loggers = self.loggers.read();
        let parent = ancestors(name)
            .find(|ancestor| loggers.contains_key(*ancestor))
            .unwrap_or(self.root.name());
        Some(parent.to_string())
    }
}
