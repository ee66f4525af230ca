//! Suite environment settings.

use std::env::VarError;
use std::path::{Path, PathBuf};

use crate::error::FixtureError;
use crate::resources::DEFAULT_RESOURCES_PATH;

/// API key consumed by the Terraform provider.
pub const API_KEY_VAR: &str = "TF_VAR_ibmcloud_api_key";

/// When `true`, resources of a failed test are kept for debugging.
pub const DO_NOT_DESTROY_VAR: &str = "DO_NOT_DESTROY_ON_FAILURE";

/// Override for the permanent resources file location.
pub const RESOURCES_PATH_VAR: &str = "VSI_PERMANENT_RESOURCES_PATH";

/// Environment the suite runs in.
#[derive(Clone, PartialEq, Eq)]
pub struct SuiteEnv {
    api_key: String,
    keep_on_failure: bool,
    resources_path: PathBuf,
}

impl std::fmt::Debug for SuiteEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteEnv")
            .field("api_key", &"<redacted>")
            .field("keep_on_failure", &self.keep_on_failure)
            .field("resources_path", &self.resources_path)
            .finish()
    }
}

impl SuiteEnv {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, FixtureError> {
        Self::from_lookup(|name| std::env::var(name))
    }

    /// Load using an arbitrary variable lookup with `std::env::var` semantics.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FixtureError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let api_key =
            optional(&lookup, API_KEY_VAR)?.ok_or(FixtureError::MissingEnv(API_KEY_VAR))?;
        if api_key.is_empty() {
            return Err(FixtureError::EmptyEnv(API_KEY_VAR));
        }

        let keep_on_failure = optional(&lookup, DO_NOT_DESTROY_VAR)?
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let resources_path: PathBuf = optional(&lookup, RESOURCES_PATH_VAR)?
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_RESOURCES_PATH.to_string())
            .into();

        Ok(Self {
            api_key,
            keep_on_failure,
            resources_path,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn resources_path(&self) -> &Path {
        &self.resources_path
    }

    pub fn teardown_policy(&self) -> TeardownPolicy {
        TeardownPolicy {
            keep_on_failure: self.keep_on_failure,
        }
    }
}

fn optional<F>(lookup: &F, name: &'static str) -> Result<Option<String>, FixtureError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(FixtureError::NonUnicodeEnv(name)),
    }
}

/// Decides whether a test's resources are destroyed when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeardownPolicy {
    pub keep_on_failure: bool,
}

impl TeardownPolicy {
    pub fn should_destroy(&self, test_failed: bool) -> bool {
        !(test_failed && self.keep_on_failure)
    }
}
