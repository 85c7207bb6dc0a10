//! Registry configuration

use crate::core::error::{RegistryError, Result};
use crate::management::ObjectName;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default root name for registry objects.
pub const DEFAULT_OBJECT_NAME: &str = "rust_logger_registry:name=Logger";

/// Default time between reconciliation passes (5 seconds).
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(5);

/// Settings for one [`Registry`](super::Registry).
///
/// Deserializes from any serde format; missing fields take their defaults.
///
/// ```
/// use rust_logger_registry::RegistryConfig;
///
/// let config: RegistryConfig = serde_json::from_str(r#"{"context": "billing"}"#).unwrap();
/// assert_eq!(
///     config.root_object_name().unwrap().as_str(),
///     "rust_logger_registry:name=Logger,context=billing"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Root identifier prefix, `<domain>:name=...`
    pub object_name: String,

    /// Application context label, appended as `context=<label>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    pub scan_interval_ms: u64,
}

impl RegistryConfig {
    /// Default configuration qualified by an application context.
    pub fn for_context(context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..Self::default()
        }
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    /// Store `interval` in whole milliseconds, rounding any fraction up.
    pub fn set_scan_interval(&mut self, interval: Duration) {
        let millis = interval.as_nanos().div_ceil(1_000_000);
        self.scan_interval_ms = u64::try_from(millis).unwrap_or(u64::MAX);
    }

    /// Name the registry's own summary object is exported under.
    pub fn root_object_name(&self) -> Result<ObjectName> {
        let root = ObjectName::new(self.object_name.as_str())?;
        match &self.context {
            Some(context) => root.with_property("context", context),
            None => Ok(root),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan_interval_ms == 0 {
            return Err(RegistryError::config(
                "RegistryConfig",
                "scan interval must be positive",
            ));
        }
        if matches!(&self.context, Some(context) if context.trim().is_empty()) {
            return Err(RegistryError::config(
                "RegistryConfig",
                "context label must not be blank",
            ));
        }
        self.root_object_name()
            .map(|_| ())
            .map_err(|e| RegistryError::config("RegistryConfig", e.to_string()))
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            context: None,
            scan_interval_ms: 5_000,
        }
    }
}
