//! # vsi-snapshot-verify
//!
//! Checks that a VSI module's apply outputs reflect a restore from a
//! pre-existing snapshot consistency group.
//!
//! ## Flow
//!
//! 1. Parse the apply outputs into an [`ApplyOutputSet`] (flat or
//!    `terraform output -json` enveloped form).
//! 2. Describe the expected snapshot ids with a [`SnapshotExpectation`].
//! 3. Run [`verify`] (or [`SnapshotRestoreVerifier::verify`] for a non-default
//!    module namespace).
//!
//! Malformed outputs surface as a [`StructuralError`]. Value differences are
//! collected into a [`VerificationResult`] so every mismatch from one apply is
//! visible at once.

mod error;
mod expectation;
mod outputs;
mod result;
mod verifier;

pub use error::{ExpectationError, StructuralError, VerificationFailed};
pub use expectation::SnapshotExpectation;
pub use outputs::ApplyOutputSet;
pub use result::{CardinalityCheck, Mismatch, VerificationResult};
pub use verifier::{
    verify, SnapshotRestoreVerifier, BOOT_SNAPSHOT_FIELD, DEFAULT_MODULE_KEY,
    STORAGE_SNAPSHOTS_FIELD,
};
