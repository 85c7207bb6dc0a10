//! Structured identifiers for managed objects

use crate::core::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An identifier of the form `domain:key=value[,key=value...]`.
///
/// Key order is significant and kept as given, so a name renders exactly the
/// way it was built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectName {
    raw: String,
    domain_len: usize,
}

impl ObjectName {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let Some(domain_len) = raw.find(':') else {
            return Err(RegistryError::invalid_object_name(raw, "missing domain separator ':'"));
        };
        if domain_len == 0 {
            return Err(RegistryError::invalid_object_name(raw, "empty domain"));
        }
        let properties = &raw[domain_len + 1..];
        if properties.is_empty() {
            return Err(RegistryError::invalid_object_name(raw, "no key properties"));
        }
        for property in properties.split(',') {
            match property.split_once('=') {
                Some((key, _)) if !key.is_empty() => {}
                _ => {
                    let message = format!("malformed key property '{}'", property);
                    return Err(RegistryError::invalid_object_name(raw.clone(), message));
                }
            }
        }
        Ok(Self { raw, domain_len })
    }

    /// Append one `key=value` property.
    pub fn with_property(&self, key: &str, value: &str) -> Result<Self> {
        Self::new(format!("{},{}={}", self.raw, key, value))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn domain(&self) -> &str {
        &self.raw[..self.domain_len]
    }

    /// Key properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.raw[self.domain_len + 1..]
            .split(',')
            .filter_map(|property| property.split_once('='))
    }

    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| value)
    }

    /// Whether this name is `prefix` itself or extends it with further properties.
    pub fn starts_with(&self, prefix: &ObjectName) -> bool {
        self.raw == prefix.raw
            || self
                .raw
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with(','))
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ObjectName {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectName {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ObjectName> for String {
    fn from(name: ObjectName) -> Self {
        name.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_name() {
        let name = ObjectName::new("app.log:name=Logger,context=web").unwrap();
        assert_eq!(name.domain(), "app.log");
        assert_eq!(name.key_property("name"), Some("Logger"));
        assert_eq!(name.key_property("context"), Some("web"));
        assert_eq!(name.key_property("logger"), None);
        assert_eq!(name.to_string(), "app.log:name=Logger,context=web");
    }

    #[test]
    fn test_reject_invalid_names() {
        assert!(ObjectName::new("no-domain").is_err());
        assert!(ObjectName::new(":name=Logger").is_err());
        assert!(ObjectName::new("app:").is_err());
        assert!(ObjectName::new("app:name").is_err());
        assert!(ObjectName::new("app:=value").is_err());
    }

    #[test]
    fn test_with_property() {
        let base = ObjectName::new("app:name=Logger").unwrap();
        let name = base.with_property("logger", "a.b").unwrap();
        assert_eq!(name.as_str(), "app:name=Logger,logger=a.b");
        assert!(name.starts_with(&base));
        assert!(base.starts_with(&base));
    }

    #[test]
    fn test_starts_with_requires_property_boundary() {
        let base = ObjectName::new("app:name=Logger").unwrap();
        let other = ObjectName::new("app:name=LoggerX").unwrap();
        assert!(!other.starts_with(&base));
    }

    #[test]
    fn test_serde_roundtrip_through_string() {
        let name = ObjectName::new("app:name=Logger").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"app:name=Logger\"");
        assert!(serde_json::from_str::<ObjectName>("\"broken\"").is_err());
    }
}
