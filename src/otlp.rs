//! Shared OTLP/JSON attribute types.
//!
//! These follow the OTLP JSON mapping (camelCase field names). Attribute
//! values in the log data model are carried as strings; metadata that is
//! not already text is canonicalized to its JSON form before it reaches
//! these types.

use serde::{Deserialize, Serialize};

/// An OTLP `AnyValue` restricted to the string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyValue {
    #[serde(rename = "stringValue")]
    pub string_value: String,
}

impl AnyValue {
    /// Wrap a string as an OTLP value.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: value.into(),
        }
    }
}

/// An OTLP attribute: a key with a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: AnyValue,
}

impl KeyValue {
    /// Create a string-valued attribute.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: AnyValue::string(value),
        }
    }
}

/// An OTLP instrumentation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
}

/// An OTLP resource: the attribute list identifying the emitting process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub attributes: Vec<KeyValue>,
}
