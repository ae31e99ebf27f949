//! Decoder implementations

use super::path::resolve_path_mut;
use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional data-property unwrapping.
///
/// A response may be an array of entities or a single object. With a data
/// property configured, every top-level item is replaced by the value found
/// at that path; arrays found there are flattened, so one envelope object can
/// expand into many entities.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dotted path to the entities inside each envelope
    data_property: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder that unwraps the given data property
    pub fn with_data_property(path: impl Into<String>) -> Self {
        Self {
            data_property: Some(path.into()),
        }
    }

    /// Create a decoder from an optional data property
    pub fn from_option(path: Option<&str>) -> Self {
        Self {
            data_property: path.map(str::to_string),
        }
    }

    /// Normalize a parsed body into a list of top-level items
    fn normalize(value: Value) -> Result<Vec<Value>> {
        match value {
            Value::Array(items) => Ok(items),
            Value::Object(map) if map.is_empty() => Ok(vec![]),
            Value::Object(map) => Ok(vec![Value::Object(map)]),
            Value::Null => Ok(vec![]),
            other => Err(Error::decode(format!(
                "expected a JSON object or array, got {}",
                json_type(&other)
            ))),
        }
    }

    /// Replace each item by the value at the data property
    fn unwrap(&self, items: Vec<Value>) -> Vec<Value> {
        let Some(path) = self.data_property.as_deref() else {
            return items;
        };

        let mut entities = Vec::with_capacity(items.len());
        for mut item in items {
            match resolve_path_mut(&mut item, path).map(Value::take) {
                Some(Value::Array(inner)) => entities.extend(inner),
                Some(value) => entities.push(value),
                None => debug!("Data property '{path}' not found in response item, skipping"),
            }
        }
        entities
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        if body.trim().is_empty() {
            return Ok(vec![]);
        }
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;
        Ok(self.unwrap(Self::normalize(value)?))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
