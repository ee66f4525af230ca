//! Permanent resources shared across the test account.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;
use vsi_snapshot_verify::SnapshotExpectation;

use crate::error::FixtureError;

/// Location of the shared permanent resources file relative to `tests/`.
pub const DEFAULT_RESOURCES_PATH: &str =
    "../common-dev-assets/common-go-assets/common-permanent-resources.yaml";

/// Long-lived resources recorded out of band (KMS instances, root keys,
/// access tags, snapshot groups).
///
/// Loaded once before the suite runs and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PermanentResources {
    entries: Map<String, Value>,
}

impl PermanentResources {
    /// Load from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let resources = Self::from_yaml_str(&contents)?;
        debug!(path = %path.display(), entries = resources.len(), "Permanent resources loaded");
        Ok(resources)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, FixtureError> {
        match serde_yaml::from_str::<Value>(contents)? {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::default()),
            _ => Err(FixtureError::Yaml(
                "expected a mapping at the top level".to_string(),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// A resource that must be present, as a JSON value.
    pub fn require(&self, key: &str) -> Result<&Value, FixtureError> {
        self.get(key)
            .ok_or_else(|| FixtureError::MissingResource(key.to_string()))
    }

    /// A resource that must be present and a string.
    pub fn require_str(&self, key: &str) -> Result<&str, FixtureError> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| FixtureError::ResourceType {
                key: key.to_string(),
                expected: "string",
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the restore expectation from the resources named by `keys`.
    pub fn snapshot_expectation(
        &self,
        keys: &ExpectationKeys,
    ) -> Result<SnapshotExpectation, FixtureError> {
        let boot = self.require_str(&keys.boot_snapshot)?;
        let volumes = keys
            .volumes
            .iter()
            .map(|(label, key)| Ok((label.clone(), self.require_str(key)?.to_string())))
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(SnapshotExpectation::new(boot, volumes)?)
    }
}

/// Which permanent resources hold the snapshot group's ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationKeys {
    /// Resource key of the boot volume snapshot id.
    pub boot_snapshot: String,

    /// `(volume attachment label, resource key)` for each data volume.
    pub volumes: Vec<(String, String)>,
}

impl ExpectationKeys {
    pub fn new(boot_snapshot: impl Into<String>) -> Self {
        Self {
            boot_snapshot: boot_snapshot.into(),
            volumes: Vec::new(),
        }
    }

    pub fn volume(mut self, label: impl Into<String>, key: impl Into<String>) -> Self {
        self.volumes.push((label.into(), key.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsi_snapshot_verify::ExpectationError;

    const YAML: &str = r#"
hpcs_south: "e6dce284-e80f-46e1-a3c1-830f7adff7a9"
hpcs_south_root_key_crn: "crn:v1:bluemix:public:hs-crypto:us-south:a/abc::key:123"
accessTags:
  - "geretain-dev:permanent"
snapshot_group_boot: "r026-AAA"
snapshot_group_block_1: "r026-BBB"
snapshot_group_block_2: "r026-CCC"
"#;

    #[test]
    fn test_require_str() {
        let resources = PermanentResources::from_yaml_str(YAML).unwrap();
        assert_eq!(
            resources.require_str("hpcs_south").unwrap(),
            "e6dce284-e80f-46e1-a3c1-830f7adff7a9"
        );
        assert!(matches!(
            resources.require_str("accessTags"),
            Err(FixtureError::ResourceType { .. })
        ));
        assert!(matches!(
            resources.require_str("nope"),
            Err(FixtureError::MissingResource(_))
        ));
    }

    #[test]
    fn test_snapshot_expectation() {
        let resources = PermanentResources::from_yaml_str(YAML).unwrap();
        let keys = ExpectationKeys::new("snapshot_group_boot")
            .volume("vsi-block-1", "snapshot_group_block_1")
            .volume("vsi-block-2", "snapshot_group_block_2");

        let exp = resources.snapshot_expectation(&keys).unwrap();
        assert_eq!(exp.group_boot_snapshot_id(), "r026-AAA");
        assert_eq!(
            exp.volume_snapshot_ids().get("vsi-block-2").map(String::as_str),
            Some("r026-CCC")
        );
    }

    #[test]
    fn test_snapshot_expectation_requires_volumes() {
        let resources = PermanentResources::from_yaml_str(YAML).unwrap();
        let err = resources
            .snapshot_expectation(&ExpectationKeys::new("snapshot_group_boot"))
            .unwrap_err();
        assert!(matches!(err, FixtureError::Expectation(_)));
    }

    #[test]
    fn test_snapshot_expectation_rejects_repeated_label() {
        let resources = PermanentResources::from_yaml_str(YAML).unwrap();
        let keys = ExpectationKeys::new("snapshot_group_boot")
            .volume("vsi-block-1", "snapshot_group_block_1")
            .volume("vsi-block-1", "snapshot_group_block_2");

        let err = resources.snapshot_expectation(&keys).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Expectation(ExpectationError::DuplicateVolumeLabel(label))
                if label == "vsi-block-1"
        ));
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        assert!(PermanentResources::from_yaml_str("- a\n- b\n").is_err());
        assert!(PermanentResources::from_yaml_str("~").unwrap().is_empty());
    }
}
