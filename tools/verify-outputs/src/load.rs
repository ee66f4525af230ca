//! Input file loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vsi_snapshot_verify::{ApplyOutputSet, SnapshotExpectation};

pub fn read_outputs(path: &Path) -> Result<ApplyOutputSet> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    ApplyOutputSet::from_terraform_json(&contents)
        .with_context(|| format!("invalid outputs: {}", path.display()))
}

pub fn read_expectation(path: &Path) -> Result<SnapshotExpectation> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
    if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid expectation JSON: {}", path.display()))
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid expectation YAML: {}", path.display()))
    }
}
