//! Snapshot-restore output verification.
//!
//! # Invariants
//!
//! - Verification is pure: inputs are borrowed immutably and nothing is
//!   cached between calls.
//! - Malformed outputs are a [`StructuralError`], never a [`Mismatch`].
//! - Per-volume comparison only runs when the storage snapshot count matches.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{json_type_name, StructuralError};
use crate::expectation::SnapshotExpectation;
use crate::outputs::ApplyOutputSet;
use crate::result::{CardinalityCheck, Mismatch, VerificationResult};

/// Output namespace of the VSI module in the example configurations.
pub const DEFAULT_MODULE_KEY: &str = "slz_vsi";

/// Snapshot id the boot volume was restored from.
pub const BOOT_SNAPSHOT_FIELD: &str = "consistency_group_boot_snapshot_id";

/// Map of data volume label to the snapshot id it was restored from.
pub const STORAGE_SNAPSHOTS_FIELD: &str = "consistency_group_storage_snapshot_ids";

/// Verifies apply outputs under one module instance namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRestoreVerifier {
    module_key: String,
}

impl Default for SnapshotRestoreVerifier {
    fn default() -> Self {
        Self {
            module_key: DEFAULT_MODULE_KEY.to_string(),
        }
    }
}

impl SnapshotRestoreVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the snapshot fields from a different module output.
    pub fn with_module_key(mut self, module_key: impl Into<String>) -> Self {
        self.module_key = module_key.into();
        self
    }

    pub fn module_key(&self) -> &str {
        &self.module_key
    }

    /// Compare the restore outputs against `expectation`.
    ///
    /// Returns every mismatch found; fails only when the outputs are malformed.
    pub fn verify(
        &self,
        outputs: &ApplyOutputSet,
        expectation: &SnapshotExpectation,
    ) -> Result<VerificationResult, StructuralError> {
        let observed = self.extract(outputs)?;
        let mut mismatches = Vec::new();

        debug!(
            module = %self.module_key,
            expected = expectation.group_boot_snapshot_id(),
            observed = observed.boot_snapshot_id,
            "Checking boot snapshot id"
        );
        if observed.boot_snapshot_id != expectation.group_boot_snapshot_id() {
            mismatches.push(Mismatch::BootSnapshot {
                expected: expectation.group_boot_snapshot_id().to_string(),
                observed: observed.boot_snapshot_id.to_string(),
            });
        }

        let cardinality = CardinalityCheck {
            expected: expectation.volume_count(),
            observed: observed.storage_snapshot_ids.len(),
        };
        debug!(
            module = %self.module_key,
            expected = cardinality.expected,
            observed = cardinality.observed,
            "Checking storage snapshot count"
        );

        if cardinality.passed() {
            for (volume, expected) in expectation.volume_snapshot_ids() {
                let actual = observed.storage_snapshot_ids.get(volume.as_str()).copied();
                if actual != Some(expected.as_str()) {
                    mismatches.push(Mismatch::VolumeSnapshot {
                        volume: volume.clone(),
                        expected: expected.clone(),
                        observed: actual.map(str::to_string),
                    });
                }
            }
        } else {
            mismatches.push(Mismatch::VolumeCount {
                expected: cardinality.expected,
                observed: cardinality.observed,
            });
        }

        for mismatch in &mismatches {
            warn!(module = %self.module_key, %mismatch, "Snapshot restore mismatch");
        }

        Ok(VerificationResult {
            mismatches,
            cardinality,
        })
    }

    fn extract<'a>(
        &self,
        outputs: &'a ApplyOutputSet,
    ) -> Result<ObservedSnapshots<'a>, StructuralError> {
        let module = outputs
            .get(&self.module_key)
            .ok_or_else(|| StructuralError::MissingKey {
                path: self.module_key.clone(),
            })?;
        let module = as_object(module, &self.module_key)?;

        let boot_path = format!("{}.{BOOT_SNAPSHOT_FIELD}", self.module_key);
        let boot_snapshot_id = as_str(
            required(module, BOOT_SNAPSHOT_FIELD, &boot_path)?,
            &boot_path,
        )?;

        let storage_path = format!("{}.{STORAGE_SNAPSHOTS_FIELD}", self.module_key);
        let storage = as_object(
            required(module, STORAGE_SNAPSHOTS_FIELD, &storage_path)?,
            &storage_path,
        )?;

        let storage_snapshot_ids = storage
            .iter()
            .map(|(volume, id)| {
                let path = format!("{storage_path}.{volume}");
                as_str(id, &path).map(|id| (volume.as_str(), id))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(ObservedSnapshots {
            boot_snapshot_id,
            storage_snapshot_ids,
        })
    }
}

/// Verify with the default module namespace.
pub fn verify(
    outputs: &ApplyOutputSet,
    expectation: &SnapshotExpectation,
) -> Result<VerificationResult, StructuralError> {
    SnapshotRestoreVerifier::default().verify(outputs, expectation)
}

/// Schema-checked view of the module's snapshot outputs.
struct ObservedSnapshots<'a> {
    boot_snapshot_id: &'a str,
    storage_snapshot_ids: BTreeMap<&'a str, &'a str>,
}

fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, StructuralError> {
    object.get(key).ok_or_else(|| StructuralError::MissingKey {
        path: path.to_string(),
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, StructuralError> {
    value.as_object().ok_or_else(|| StructuralError::NotAnObject {
        path: path.to_string(),
        actual: json_type_name(value),
    })
}

fn as_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, StructuralError> {
    value.as_str().ok_or_else(|| StructuralError::WrongType {
        path: path.to_string(),
        expected: "string",
        actual: json_type_name(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expectation() -> SnapshotExpectation {
        SnapshotExpectation::new(
            "r026-AAA",
            [("vsi-block-1", "r026-BBB"), ("vsi-block-2", "r026-CCC")],
        )
        .unwrap()
    }

    fn outputs(module: Value) -> ApplyOutputSet {
        ApplyOutputSet::from_value(json!({ "slz_vsi": module })).unwrap()
    }

    #[test]
    fn test_custom_module_key() {
        let outputs = ApplyOutputSet::from_value(json!({
            "vsi_restore": {
                "consistency_group_boot_snapshot_id": "r026-AAA",
                "consistency_group_storage_snapshot_ids": {
                    "vsi-block-1": "r026-BBB",
                    "vsi-block-2": "r026-CCC"
                }
            }
        }))
        .unwrap();

        let verifier = SnapshotRestoreVerifier::new().with_module_key("vsi_restore");
        assert_eq!(verifier.module_key(), "vsi_restore");
        assert!(verifier.verify(&outputs, &expectation()).unwrap().passed());

        let err = verify(&outputs, &expectation()).unwrap_err();
        assert_eq!(
            err,
            StructuralError::MissingKey {
                path: "slz_vsi".to_string()
            }
        );
    }

    #[test]
    fn test_module_not_an_object() {
        let err = verify(&outputs(json!("r026-AAA")), &expectation()).unwrap_err();
        assert_eq!(
            err,
            StructuralError::NotAnObject {
                path: "slz_vsi".to_string(),
                actual: "string",
            }
        );
    }

    #[test]
    fn test_missing_boot_field() {
        let err = verify(
            &outputs(json!({
                "consistency_group_storage_snapshot_ids": {}
            })),
            &expectation(),
        )
        .unwrap_err();
        assert_eq!(
            err.path(),
            Some("slz_vsi.consistency_group_boot_snapshot_id")
        );
        assert!(matches!(err, StructuralError::MissingKey { .. }));
    }

    #[test]
    fn test_boot_field_wrong_type() {
        let err = verify(
            &outputs(json!({
                "consistency_group_boot_snapshot_id": null,
                "consistency_group_storage_snapshot_ids": {}
            })),
            &expectation(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StructuralError::WrongType {
                path: "slz_vsi.consistency_group_boot_snapshot_id".to_string(),
                expected: "string",
                actual: "null",
            }
        );
    }

    #[test]
    fn test_storage_map_not_an_object() {
        let err = verify(
            &outputs(json!({
                "consistency_group_boot_snapshot_id": "r026-AAA",
                "consistency_group_storage_snapshot_ids": ["r026-BBB", "r026-CCC"]
            })),
            &expectation(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StructuralError::NotAnObject {
                path: "slz_vsi.consistency_group_storage_snapshot_ids".to_string(),
                actual: "array",
            }
        );
    }

    #[test]
    fn test_storage_value_wrong_type() {
        let err = verify(
            &outputs(json!({
                "consistency_group_boot_snapshot_id": "r026-AAA",
                "consistency_group_storage_snapshot_ids": {
                    "vsi-block-1": "r026-BBB",
                    "vsi-block-2": 7
                }
            })),
            &expectation(),
        )
        .unwrap_err();
        assert_eq!(
            err.path(),
            Some("slz_vsi.consistency_group_storage_snapshot_ids.vsi-block-2")
        );
    }

    #[test]
    fn test_missing_volume_key_with_matching_count() {
        let result = verify(
            &outputs(json!({
                "consistency_group_boot_snapshot_id": "r026-AAA",
                "consistency_group_storage_snapshot_ids": {
                    "vsi-block-1": "r026-BBB",
                    "vsi-block-9": "r026-CCC"
                }
            })),
            &expectation(),
        )
        .unwrap();

        assert!(!result.passed());
        assert_eq!(
            result.mismatches,
            vec![Mismatch::VolumeSnapshot {
                volume: "vsi-block-2".to_string(),
                expected: "r026-CCC".to_string(),
                observed: None,
            }]
        );
    }

    #[test]
    fn test_aggregates_boot_and_count_mismatches() {
        let result = verify(
            &outputs(json!({
                "consistency_group_boot_snapshot_id": "r026-WRONG",
                "consistency_group_storage_snapshot_ids": {}
            })),
            &expectation(),
        )
        .unwrap();

        assert_eq!(result.mismatches.len(), 2);
        assert!(matches!(result.mismatches[0], Mismatch::BootSnapshot { .. }));
        assert_eq!(
            result.mismatches[1],
            Mismatch::VolumeCount {
                expected: 2,
                observed: 0
            }
        );
    }

    #[test]
    fn test_extra_fields_ignored() {
        let result = verify(
            &outputs(json!({
                "consistency_group_boot_snapshot_id": "r026-AAA",
                "consistency_group_storage_snapshot_ids": {
                    "vsi-block-1": "r026-BBB",
                    "vsi-block-2": "r026-CCC"
                },
                "ids": ["02u7_1", "02u7_2"]
            })),
            &expectation(),
        )
        .unwrap();
        assert!(result.passed());
    }
}
