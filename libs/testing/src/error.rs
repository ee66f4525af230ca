//! Error types for suite fixtures.

use std::path::PathBuf;

use thiserror::Error;
use vsi_snapshot_verify::ExpectationError;

/// Errors raised while assembling suite fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Could not read the permanent resources file.
    #[error("failed to read permanent resources from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The permanent resources file is not a YAML mapping.
    #[error("invalid permanent resources YAML: {0}")]
    Yaml(String),

    /// A permanent resource the suite depends on is absent.
    #[error("permanent resource '{0}' not found")]
    MissingResource(String),

    /// A permanent resource has an unexpected type.
    #[error("permanent resource '{key}' must be a {expected}")]
    ResourceType { key: String, expected: &'static str },

    /// A required environment variable is not set.
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),

    /// A required environment variable is set but empty.
    #[error("{0} environment variable is empty")]
    EmptyEnv(&'static str),

    /// An environment variable is set but not valid UTF-8.
    #[error("{0} environment variable is not valid UTF-8")]
    NonUnicodeEnv(&'static str),

    /// A JSON output could not be parsed.
    #[error("invalid {output} output: {detail}")]
    Output { output: &'static str, detail: String },

    /// The resources do not form a valid snapshot expectation.
    #[error("invalid snapshot expectation: {0}")]
    Expectation(#[from] ExpectationError),
}

impl From<serde_yaml::Error> for FixtureError {
    fn from(err: serde_yaml::Error) -> Self {
        FixtureError::Yaml(err.to_string())
    }
}
