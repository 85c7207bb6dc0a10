//! Logger registry and its management-facing handles

pub mod config;
pub mod handle;
pub mod logger_registry;

pub use config::{RegistryConfig, DEFAULT_OBJECT_NAME, DEFAULT_SCAN_INTERVAL};
pub use handle::{LoggerHandle, ROOT_LOGGER_KEY};
pub use logger_registry::{Registry, RegistryBuilder, PRESERVE_PACKAGES, WORKER_THREAD_NAME};
