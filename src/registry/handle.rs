//! Management bridge for a single logger

use crate::core::error::{RegistryError, Result};
use crate::core::hierarchy::LoggerRepository;
use crate::core::level_setting::LevelSetting;
use crate::management::{Attribute, ManagedObject};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Parent name reported for the root logger, and the key its handle is
/// exported under.
pub const ROOT_LOGGER_KEY: &str = "_ROOT_";

const ATTRIBUTES: &[Attribute] = &[
    Attribute::read_only("name"),
    Attribute::read_write("level"),
    Attribute::read_only("effectiveLevel"),
    Attribute::read_only("parentName"),
];

/// One logger as seen through the management surface.
///
/// The handle keeps only the logger's name; every read and write goes straight
/// to the repository, so values are never stale.
pub struct LoggerHandle {
    name: String,
    repository: Arc<dyn LoggerRepository>,
    // Written only by the reconciliation pass
    generation: AtomicU64,
}

impl LoggerHandle {
    pub(crate) fn new(
        name: impl Into<String>,
        repository: Arc<dyn LoggerRepository>,
        generation: u64,
    ) -> Self {
        Self {
            name: name.into(),
            repository,
            generation: AtomicU64::new(generation),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit level of the logger, `<unset>` when it inherits.
    pub fn level(&self) -> Result<String> {
        LevelSetting::display(self.repository.level(&self.name))
    }

    /// Level in force after inheritance.
    pub fn effective_level(&self) -> Result<String> {
        LevelSetting::display(self.repository.effective_level(&self.name))
    }

    /// Change the explicit level from operator input.
    ///
    /// Blank text clears the level so the logger inherits again. Text that is
    /// not a settable level name leaves the level untouched.
    pub fn set_level(&self, text: &str) {
        if text.trim().is_empty() {
            self.repository.set_level(&self.name, None);
            return;
        }
        match LevelSetting::parse(text) {
            Some(setting) => self.repository.set_level(&self.name, Some(setting.level())),
            None => debug!(logger = %self.name, level = text, "ignoring unsettable level"),
        }
    }

    pub fn parent_name(&self) -> String {
        self.repository
            .parent(&self.name)
            .unwrap_or_else(|| ROOT_LOGGER_KEY.to_string())
    }

    /// Reconciliation pass that last observed this logger.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub(crate) fn set_generation(&self, generation: u64) {
        self.generation.store(generation, Ordering::Release);
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.name)
            .field("generation", &self.generation())
            .finish()
    }
}

impl ManagedObject for LoggerHandle {
    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn get_attribute(&self, name: &str) -> Result<Value> {
        match name {
            "name" => Ok(Value::from(self.name())),
            "level" => self.level().map(Value::from),
            "effectiveLevel" => self.effective_level().map(Value::from),
            "parentName" => Ok(Value::from(self.parent_name())),
            _ => Err(RegistryError::unknown_attribute(name)),
        }
    }

    fn set_attribute(&self, name: &str, value: Value) -> Result<()> {
        match name {
            "level" => match value {
                Value::String(text) => {
                    self.set_level(&text);
                    Ok(())
                }
                Value::Null => {
                    self.set_level("");
                    Ok(())
                }
                other => Err(RegistryError::invalid_value(
                    name,
                    format!("expected a string, got {}", other),
                )),
            },
            "name" | "effectiveLevel" | "parentName" => Err(RegistryError::read_only(name)),
            _ => Err(RegistryError::unknown_attribute(name)),
        }
    }
}
