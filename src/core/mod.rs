//! Core types: levels, errors, metrics and the logger hierarchy

pub mod error;
pub mod hierarchy;
pub mod level;
pub mod level_setting;
pub mod metrics;

pub use error::{RegistryError, Result};
pub use hierarchy::{Hierarchy, Logger, LoggerRepository, ROOT_LOGGER_NAME};
pub use level::Level;
pub use level_setting::{LevelSetting, UNSET};
pub use metrics::RegistryMetrics;
