//! In-process management server

use super::managed::ManagedObject;
use super::object_name::ObjectName;
use crate::core::error::{RegistryError, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registration side of a management transport.
pub trait Exporter: Send + Sync {
    /// Register `object` under `name`.
    ///
    /// Fails with [`RegistryError::AlreadyExported`] when the name is taken.
    fn export(&self, name: &ObjectName, object: Arc<dyn ManagedObject>) -> Result<()>;

    /// Withdraw whatever is registered under `name`.
    ///
    /// Fails with [`RegistryError::NotExported`] when nothing is.
    fn unexport(&self, name: &ObjectName) -> Result<()>;
}

/// Managed objects keyed by name, with attribute access for operators.
///
/// # Example
///
/// ```
/// use rust_logger_registry::{Hierarchy, ManagementServer, Registry};
/// use std::sync::Arc;
///
/// let hierarchy = Arc::new(Hierarchy::new());
/// hierarchy.logger("com.example.web");
///
/// let server = Arc::new(ManagementServer::new());
/// let registry = Registry::builder()
///     .repository(hierarchy.clone())
///     .exporter(server.clone())
///     .build()
///     .unwrap();
///
/// registry.start().unwrap();
/// let name = registry.object_name_for("com.example.web").unwrap();
/// server.set_attribute(&name, "level", "WARN".into()).unwrap();
/// assert_eq!(server.get_attribute(&name, "level").unwrap(), "WARN");
/// registry.stop();
/// ```
#[derive(Default)]
pub struct ManagementServer {
    objects: RwLock<BTreeMap<ObjectName, Arc<dyn ManagedObject>>>,
}

impl ManagementServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &ObjectName) -> Option<Arc<dyn ManagedObject>> {
        self.objects.read().get(name).cloned()
    }

    pub fn is_registered(&self, name: &ObjectName) -> bool {
        self.objects.read().contains_key(name)
    }

    /// All registered names in sorted order.
    pub fn names(&self) -> Vec<ObjectName> {
        self.objects.read().keys().cloned().collect()
    }

    /// Names equal to or extending `prefix`.
    pub fn query(&self, prefix: &ObjectName) -> Vec<ObjectName> {
        self.objects
            .read()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    pub fn get_attribute(&self, name: &ObjectName, attribute: &str) -> Result<Value> {
        self.lookup(name)?.get_attribute(attribute)
    }

    pub fn set_attribute(&self, name: &ObjectName, attribute: &str, value: Value) -> Result<()> {
        self.lookup(name)?.set_attribute(attribute, value)
    }

    // Clone the object out so attribute access runs without holding the table lock.
    fn lookup(&self, name: &ObjectName) -> Result<Arc<dyn ManagedObject>> {
        self.get(name)
            .ok_or_else(|| RegistryError::not_exported(name.as_str()))
    }
}

impl Exporter for ManagementServer {
    fn export(&self, name: &ObjectName, object: Arc<dyn ManagedObject>) -> Result<()> {
        let mut objects = self.objects.write();
        if objects.contains_key(name) {
            return Err(RegistryError::already_exported(name.as_str()));
        }
        objects.insert(name.clone(), object);
        Ok(())
    }

    fn unexport(&self, name: &ObjectName) -> Result<()> {
        self.objects
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RegistryError::not_exported(name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::management::managed::Attribute;
    use parking_lot::Mutex;

    struct Counter {
        value: Mutex<i64>,
    }

    impl ManagedObject for Counter {
        fn attributes(&self) -> &'static [Attribute] {
            const ATTRIBUTES: &[Attribute] = &[Attribute::read_write("value")];
            ATTRIBUTES
        }

        fn get_attribute(&self, name: &str) -> Result<Value> {
            match name {
                "value" => Ok(Value::from(*self.value.lock())),
                _ => Err(RegistryError::unknown_attribute(name)),
            }
        }

        fn set_attribute(&self, name: &str, value: Value) -> Result<()> {
            match name {
                "value" => {
                    let value = value
                        .as_i64()
                        .ok_or_else(|| RegistryError::invalid_value(name, "expected an integer"))?;
                    *self.value.lock() = value;
                    Ok(())
                }
                _ => Err(RegistryError::unknown_attribute(name)),
            }
        }
    }

    fn counter() -> Arc<dyn ManagedObject> {
        Arc::new(Counter {
            value: Mutex::new(0),
        })
    }

    fn name(raw: &str) -> ObjectName {
        ObjectName::new(raw).unwrap()
    }

    #[test]
    fn test_export_and_access() {
        let server = ManagementServer::new();
        let object_name = name("test:name=Counter");
        server.export(&object_name, counter()).unwrap();

        server
            .set_attribute(&object_name, "value", Value::from(7))
            .unwrap();
        assert_eq!(server.get_attribute(&object_name, "value").unwrap(), 7);
        assert!(server.get_attribute(&object_name, "missing").is_err());
    }

    #[test]
    fn test_export_collision() {
        let server = ManagementServer::new();
        let object_name = name("test:name=Counter");
        server.export(&object_name, counter()).unwrap();

        let err = server.export(&object_name, counter()).unwrap_err();
        assert!(err.is_collision());
        assert_eq!(server.len(), 1);
    }

    #[test]
    fn test_unexport() {
        let server = ManagementServer::new();
        let object_name = name("test:name=Counter");
        server.export(&object_name, counter()).unwrap();

        server.unexport(&object_name).unwrap();
        assert!(server.is_empty());
        assert!(matches!(
            server.unexport(&object_name),
            Err(RegistryError::NotExported { .. })
        ));
        assert!(server.get_attribute(&object_name, "value").is_err());
    }

    #[test]
    fn test_query_by_prefix() {
        let server = ManagementServer::new();
        for raw in [
            "test:name=Logger",
            "test:name=Logger,logger=a.b",
            "test:name=Logger,logger=a.b,logger2=c",
            "test:name=Other",
        ] {
            server.export(&name(raw), counter()).unwrap();
        }

        let found = server.query(&name("test:name=Logger"));
        assert_eq!(found.len(), 3);
        assert!(!found.contains(&name("test:name=Other")));
    }
}
