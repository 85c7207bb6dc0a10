//! Managed object trait

use crate::core::error::Result;
use serde_json::Value;

/// Description of one attribute on a managed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub writable: bool,
}

impl Attribute {
    pub const fn read_only(name: &'static str) -> Self {
        Self {
            name,
            writable: false,
        }
    }

    pub const fn read_write(name: &'static str) -> Self {
        Self {
            name,
            writable: true,
        }
    }
}

/// An object whose attributes can be read and written through a management
/// server.
///
/// Attribute access may arrive from any thread.
pub trait ManagedObject: Send + Sync {
    fn attributes(&self) -> &'static [Attribute];

    fn get_attribute(&self, name: &str) -> Result<Value>;

    fn set_attribute(&self, name: &str, value: Value) -> Result<()>;
}
