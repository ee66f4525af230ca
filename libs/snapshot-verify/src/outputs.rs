//! Apply output parsing.

use serde_json::{Map, Value};

use crate::error::{json_type_name, StructuralError};

/// Keys `terraform output -json` wraps each output value in.
const ENVELOPE_KEYS: [&str; 3] = ["sensitive", "type", "value"];

/// Named outputs produced by one infrastructure apply.
///
/// Read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutputSet {
    outputs: Map<String, Value>,
}

impl ApplyOutputSet {
    /// Wrap a flat `{name: value}` object.
    pub fn from_value(value: Value) -> Result<Self, StructuralError> {
        match value {
            Value::Object(outputs) => Ok(Self { outputs }),
            other => Err(StructuralError::NotAnObject {
                path: "<root>".to_string(),
                actual: json_type_name(&other),
            }),
        }
    }

    /// Parse a JSON outputs document.
    ///
    /// Accepts both the flat form and the `{"sensitive", "type", "value"}`
    /// envelope printed by `terraform output -json`.
    pub fn from_terraform_json(json: &str) -> Result<Self, StructuralError> {
        let value: Value = serde_json::from_str(json)?;
        let Self { outputs } = Self::from_value(value)?;

        let outputs = outputs
            .into_iter()
            .map(|(name, value)| (name, unwrap_envelope(value)))
            .collect();

        Ok(Self { outputs })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.outputs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    /// Output names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if map.contains_key("value")
                && map.keys().all(|k| ENVELOPE_KEYS.contains(&k.as_str())) =>
        {
            map.remove("value").unwrap_or(Value::Null)
        }
        other => other,
    }
}
