//! Error types for snapshot verification.

use thiserror::Error;

use crate::result::VerificationResult;

/// The apply outputs do not have the shape the verifier expects.
///
/// This is never raised for a value that merely differs from the expectation;
/// those are reported as [`crate::Mismatch`] entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The outputs document is not valid JSON.
    #[error("invalid outputs JSON: {0}")]
    InvalidJson(String),

    /// A value that must be a mapping is something else.
    #[error("expected an object at '{path}', got {actual}")]
    NotAnObject { path: String, actual: &'static str },

    /// A required key is absent.
    #[error("missing required output key '{path}'")]
    MissingKey { path: String },

    /// A value has the wrong JSON type.
    #[error("wrong type at '{path}': expected {expected}, got {actual}")]
    WrongType {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl StructuralError {
    /// Dotted path of the offending value, if the error points at one.
    pub fn path(&self) -> Option<&str> {
        match self {
            StructuralError::InvalidJson(_) => None,
            StructuralError::NotAnObject { path, .. }
            | StructuralError::MissingKey { path }
            | StructuralError::WrongType { path, .. } => Some(path),
        }
    }
}

impl From<serde_json::Error> for StructuralError {
    fn from(err: serde_json::Error) -> Self {
        StructuralError::InvalidJson(err.to_string())
    }
}

/// Invalid expectation data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpectationError {
    #[error("boot snapshot id cannot be empty")]
    EmptyBootSnapshotId,

    #[error("at least one volume snapshot id is required")]
    NoVolumes,

    #[error("volume label cannot be empty")]
    EmptyVolumeLabel,

    #[error("snapshot id for volume '{0}' cannot be empty")]
    EmptyVolumeSnapshotId(String),

    #[error("volume '{0}' is listed more than once")]
    DuplicateVolumeLabel(String),
}

/// A verification run completed but recorded mismatches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", .0.summary())]
pub struct VerificationFailed(pub VerificationResult);

impl VerificationFailed {
    /// The full result, including every mismatch.
    pub fn result(&self) -> &VerificationResult {
        &self.0
    }
}

/// Human-readable name of a JSON value's type.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
