//! Error types for the logger registry

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The framework reported a level value with no management counterpart
    #[error("Unknown level {value} encountered")]
    UnmappedLevel { value: i32 },

    /// Another object already owns the name
    #[error("Object '{name}' is already exported")]
    AlreadyExported { name: String },

    /// Nothing is exported under the name
    #[error("Object '{name}' is not exported")]
    NotExported { name: String },

    #[error("Unknown attribute '{attribute}'")]
    UnknownAttribute { attribute: String },

    #[error("Attribute '{attribute}' is read-only")]
    ReadOnlyAttribute { attribute: String },

    /// Value of the wrong shape for an attribute
    #[error("Invalid value for attribute '{attribute}': {message}")]
    InvalidAttributeValue { attribute: String, message: String },

    #[error("Invalid object name '{name}': {message}")]
    InvalidObjectName { name: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The reconciliation worker could not be spawned
    #[error("Failed to spawn reconciliation worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

impl RegistryError {
    pub fn unmapped_level(value: i32) -> Self {
        RegistryError::UnmappedLevel { value }
    }

    pub fn already_exported(name: impl Into<String>) -> Self {
        RegistryError::AlreadyExported { name: name.into() }
    }

    pub fn not_exported(name: impl Into<String>) -> Self {
        RegistryError::NotExported { name: name.into() }
    }

    pub fn unknown_attribute(attribute: impl Into<String>) -> Self {
        RegistryError::UnknownAttribute {
            attribute: attribute.into(),
        }
    }

    pub fn read_only(attribute: impl Into<String>) -> Self {
        RegistryError::ReadOnlyAttribute {
            attribute: attribute.into(),
        }
    }

    pub fn invalid_value(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidAttributeValue {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    pub fn invalid_object_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidObjectName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether the error is a name collision in the management transport.
    pub fn is_collision(&self) -> bool {
        matches!(self, RegistryError::AlreadyExported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RegistryError::unmapped_level(42);
        assert!(matches!(err, RegistryError::UnmappedLevel { value: 42 }));

        let err = RegistryError::config("RegistryConfig", "scan interval must be positive");
        assert!(matches!(err, RegistryError::InvalidConfiguration { .. }));

        let err = RegistryError::already_exported("app:name=Logger");
        assert!(err.is_collision());
        assert!(!RegistryError::not_exported("app:name=Logger").is_collision());
    }

    #[test]
    fn test_error_display() {
        let err = RegistryError::unmapped_level(15000);
        assert_eq!(err.to_string(), "Unknown level 15000 encountered");

        let err = RegistryError::read_only("effectiveLevel");
        assert_eq!(err.to_string(), "Attribute 'effectiveLevel' is read-only");

        let err = RegistryError::invalid_value("level", "expected a string");
        assert_eq!(
            err.to_string(),
            "Invalid value for attribute 'level': expected a string"
        );
    }

    #[test]
    fn test_worker_spawn_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left");
        let err: RegistryError = io_err.into();

        assert!(matches!(err, RegistryError::WorkerSpawn(_)));
        assert!(err.to_string().contains("no threads left"));
    }
}
