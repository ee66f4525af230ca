//! Verification results.

use std::fmt;

use serde::Serialize;

use crate::error::VerificationFailed;
use crate::verifier::{BOOT_SNAPSHOT_FIELD, STORAGE_SNAPSHOTS_FIELD};

/// One expected-vs-observed difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// The boot volume was restored from a different snapshot.
    BootSnapshot { expected: String, observed: String },

    /// The storage snapshot map has the wrong number of entries.
    VolumeCount { expected: usize, observed: usize },

    /// A data volume reports a different snapshot id, or none at all.
    VolumeSnapshot {
        volume: String,
        expected: String,
        observed: Option<String>,
    },
}

impl Mismatch {
    /// Output field the mismatch was found in.
    pub fn field(&self) -> String {
        match self {
            Mismatch::BootSnapshot { .. } => BOOT_SNAPSHOT_FIELD.to_string(),
            Mismatch::VolumeCount { .. } => STORAGE_SNAPSHOTS_FIELD.to_string(),
            Mismatch::VolumeSnapshot { volume, .. } => {
                format!("{STORAGE_SNAPSHOTS_FIELD}.{volume}")
            }
        }
    }

    pub fn expected(&self) -> String {
        match self {
            Mismatch::BootSnapshot { expected, .. }
            | Mismatch::VolumeSnapshot { expected, .. } => expected.clone(),
            Mismatch::VolumeCount { expected, .. } => format!("{expected} entries"),
        }
    }

    pub fn observed(&self) -> String {
        match self {
            Mismatch::BootSnapshot { observed, .. } => observed.clone(),
            Mismatch::VolumeSnapshot { observed, .. } => observed
                .clone()
                .unwrap_or_else(|| "<missing>".to_string()),
            Mismatch::VolumeCount { observed, .. } => format!("{observed} entries"),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, observed {}",
            self.field(),
            self.expected(),
            self.observed()
        )
    }
}

/// Outcome of the storage snapshot cardinality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardinalityCheck {
    pub expected: usize,
    pub observed: usize,
}

impl CardinalityCheck {
    pub fn passed(&self) -> bool {
        self.expected == self.observed
    }
}

impl fmt::Display for CardinalityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "ok" } else { "mismatch" };
        write!(
            f,
            "storage snapshot count {status} (expected {}, observed {})",
            self.expected, self.observed
        )
    }
}

/// Aggregated result of one verification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub mismatches: Vec<Mismatch>,
    pub cardinality: CardinalityCheck,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Ok if nothing mismatched, otherwise a [`VerificationFailed`] carrying
    /// the full result.
    pub fn into_outcome(self) -> Result<Self, VerificationFailed> {
        if self.passed() {
            Ok(self)
        } else {
            Err(VerificationFailed(self))
        }
    }

    /// Multi-line report: one line per mismatch plus the cardinality outcome.
    pub fn summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.mismatches.len() + 1);
        if self.passed() {
            lines.push("snapshot verification passed".to_string());
        } else {
            lines.push(format!(
                "snapshot verification failed with {} mismatch(es)",
                self.mismatches.len()
            ));
            lines.extend(self.mismatches.iter().map(|m| format!("  {m}")));
        }
        lines.push(format!("  {}", self.cardinality));
        lines.join("\n")
    }
}
