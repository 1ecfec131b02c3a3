//! Process-wide resource attributes.
//!
//! The resource identifies the emitting process and is attached
//! identically to every log record and metric envelope. It is fixed at
//! startup and never mutated.

use crate::otlp::KeyValue;

/// Static identity of the emitting process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// `service.name` resource attribute
    pub service_name: String,
    /// `service.version` resource attribute
    pub service_version: String,
}

impl ResourceDescriptor {
    /// Create a resource descriptor for the given service identity.
    pub fn new(service_name: impl Into<String>, service_version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
        }
    }

    /// Render the resource as OTLP attributes.
    #[must_use]
    pub fn attributes(&self) -> Vec<KeyValue> {
        vec![
            KeyValue::string("service.name", &self.service_name),
            KeyValue::string("service.version", &self.service_version),
        ]
    }
}

impl Default for ResourceDescriptor {
    fn default() -> Self {
        Self::new("lantern-app", "1.0.0")
    }
}
