use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ExpectationError;

/// Snapshot ids a restored VSI is expected to report.
///
/// The values come from a long-lived snapshot consistency group recorded out
/// of band, so they are fixed per test account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExpectation")]
pub struct SnapshotExpectation {
    group_boot_snapshot_id: String,
    volume_snapshot_ids: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawExpectation {
    group_boot_snapshot_id: String,
    #[serde(deserialize_with = "volume_entries")]
    volume_snapshot_ids: Vec<(String, String)>,
}

/// Keeps map entries in document order so repeated labels reach
/// [`SnapshotExpectation::new`] instead of being collapsed by the map.
fn volume_entries<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of volume label to snapshot id")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, String>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

impl TryFrom<RawExpectation> for SnapshotExpectation {
    type Error = ExpectationError;

    fn try_from(raw: RawExpectation) -> Result<Self, Self::Error> {
        Self::new(raw.group_boot_snapshot_id, raw.volume_snapshot_ids)
    }
}

impl SnapshotExpectation {
    /// Build an expectation, keyed by volume attachment label.
    pub fn new<B, I, K, V>(group_boot_snapshot_id: B, volumes: I) -> Result<Self, ExpectationError>
    where
        B: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let group_boot_snapshot_id = group_boot_snapshot_id.into();
        if group_boot_snapshot_id.is_empty() {
            return Err(ExpectationError::EmptyBootSnapshotId);
        }

        let mut volume_snapshot_ids = BTreeMap::new();
        for (label, id) in volumes {
            let label = label.into();
            let id = id.into();
            if label.is_empty() {
                return Err(ExpectationError::EmptyVolumeLabel);
            }
            if id.is_empty() {
                return Err(ExpectationError::EmptyVolumeSnapshotId(label));
            }
            if volume_snapshot_ids.insert(label.clone(), id).is_some() {
                return Err(ExpectationError::DuplicateVolumeLabel(label));
            }
        }

        if volume_snapshot_ids.is_empty() {
            return Err(ExpectationError::NoVolumes);
        }

        Ok(Self {
            group_boot_snapshot_id,
            volume_snapshot_ids,
        })
    }

    pub fn group_boot_snapshot_id(&self) -> &str {
        &self.group_boot_snapshot_id
    }

    /// Expected snapshot id per volume label, in label order.
    pub fn volume_snapshot_ids(&self) -> &BTreeMap<String, String> {
        &self.volume_snapshot_ids
    }

    pub fn volume_count(&self) -> usize {
        self.volume_snapshot_ids.len()
    }
}
