//! # Rust Logger Registry
//!
//! Runtime management of a hierarchical logger configuration.
//!
//! ## Features
//!
//! - **Live View**: Every logger of the hierarchy is exported as a managed
//!   object with its name, explicit level, effective level and parent
//! - **Runtime Control**: Operators change levels without restarting
//! - **Self-Healing**: A background reconciliation loop adds new loggers and
//!   retires vanished ones using a generation counter
//! - **Best Effort**: Failures of the management mirror never reach the
//!   application

pub mod core;
pub mod lifecycle;
pub mod management;
pub mod registry;

pub mod prelude {
    pub use crate::core::{
        Hierarchy, Level, LevelSetting, Logger, LoggerRepository, RegistryError,
        RegistryMetrics, Result, ROOT_LOGGER_NAME, UNSET,
    };
    pub use crate::lifecycle::{Lifecycle, LifecycleStage, LoggingModule};
    pub use crate::management::{Attribute, Exporter, ManagedObject, ManagementServer, ObjectName};
    pub use crate::registry::{
        LoggerHandle, Registry, RegistryBuilder, RegistryConfig, DEFAULT_OBJECT_NAME,
        PRESERVE_PACKAGES, ROOT_LOGGER_KEY,
    };
}

pub use crate::core::{
    Hierarchy, Level, LevelSetting, Logger, LoggerRepository, RegistryError, RegistryMetrics,
    Result, ROOT_LOGGER_NAME, UNSET,
};
pub use crate::lifecycle::{Lifecycle, LifecycleAction, LifecycleStage, LoggingModule};
pub use crate::management::{Attribute, Exporter, ManagedObject, ManagementServer, ObjectName};
pub use crate::registry::{
    LoggerHandle, Registry, RegistryBuilder, RegistryConfig, DEFAULT_OBJECT_NAME,
    DEFAULT_SCAN_INTERVAL, PRESERVE_PACKAGES, ROOT_LOGGER_KEY,
};
