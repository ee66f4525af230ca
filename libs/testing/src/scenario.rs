//! Test case descriptions for the example configurations.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};

use crate::error::FixtureError;
use crate::resources::PermanentResources;

// Basic runs its own directory instead of sharing FSCLOUD_EXAMPLE_DIR.
pub const BASIC_EXAMPLE_DIR: &str = "examples/basic";
pub const FSCLOUD_EXAMPLE_DIR: &str = "examples/fscloud";
pub const LANDING_ZONE_EXTENSION_DIR: &str = "extension/landing-zone";
/// Pre-requisite landing zone applied before the extension test.
pub const SLZ_RESOURCES_DIR: &str = "./resources";

pub const FSCLOUD_PREFIX: &str = "slz-vsi-fscloud";
pub const UPGRADE_PREFIX: &str = "slz-vsi-upg";

pub const RESOURCE_GROUP: &str = "geretain-test-resources";
pub const REGION: &str = "us-south";

const UNIQUE_ID_LEN: usize = 6;

/// `<base>-<random lowercase id>`, unique per test run.
pub fn unique_prefix(base: &str) -> String {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(UNIQUE_ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{base}-{id}")
}

/// Everything the orchestration needs to run one test case.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    pub terraform_dir: &'static str,
    pub prefix: String,
    pub resource_group: Option<String>,
    pub region: String,
    pub vars: Map<String, Value>,

    /// Terraform workspace to select or create before applying.
    pub workspace: Option<String>,

    /// Fail the test when the implicit destroy after a consistency run fails.
    pub implicit_destroy_required: bool,
}

impl Scenario {
    /// Basic example in the default region.
    pub fn basic(resources: &PermanentResources) -> Result<Self, FixtureError> {
        Ok(Self {
            name: "basic",
            terraform_dir: BASIC_EXAMPLE_DIR,
            prefix: "slz-vsi-basic".to_string(),
            resource_group: Some(RESOURCE_GROUP.to_string()),
            region: REGION.to_string(),
            vars: encrypted_vars(resources, true)?,
            workspace: None,
            implicit_destroy_required: true,
        })
    }

    /// FSCloud profile upgrade run.
    pub fn fscloud_upgrade(resources: &PermanentResources) -> Result<Self, FixtureError> {
        Ok(Self {
            name: "fscloud-upgrade",
            ..Self::fscloud(resources, UPGRADE_PREFIX)?
        })
    }

    /// FSCloud profile example.
    pub fn fscloud(resources: &PermanentResources, prefix: &str) -> Result<Self, FixtureError> {
        Ok(Self {
            name: "fscloud",
            terraform_dir: FSCLOUD_EXAMPLE_DIR,
            prefix: prefix.to_string(),
            resource_group: Some(RESOURCE_GROUP.to_string()),
            region: REGION.to_string(),
            vars: encrypted_vars(resources, true)?,
            workspace: None,
            implicit_destroy_required: true,
        })
    }

    /// Landing zone extension deployed into an existing management VPC.
    pub fn landing_zone_extension(
        resources: &PermanentResources,
        prefix: &str,
        region: &str,
        vpc_id: &str,
    ) -> Result<Self, FixtureError> {
        let mut vars = encrypted_vars(resources, false)?;
        vars.insert("prefix".into(), Value::from(prefix));
        vars.insert("region".into(), Value::from(region));
        vars.insert(
            "resource_group".into(),
            Value::from(format!("{prefix}-management-rg")),
        );
        vars.insert("vpc_id".into(), Value::from(vpc_id));

        Ok(Self {
            name: "landing-zone-extension",
            terraform_dir: LANDING_ZONE_EXTENSION_DIR,
            prefix: prefix.to_string(),
            resource_group: None,
            region: region.to_string(),
            vars,
            workspace: None,
            implicit_destroy_required: false,
        })
    }

    /// Landing zone the extension test deploys into, applied first and
    /// destroyed last. Runs in a workspace named after the prefix.
    pub fn slz_existing_resources<I, T>(prefix: &str, region: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();

        let mut vars = Map::new();
        vars.insert("prefix".into(), Value::from(prefix));
        vars.insert("region".into(), Value::from(region));
        vars.insert("resource_tags".into(), Value::Array(tags));

        Self {
            name: "slz-existing-resources",
            terraform_dir: SLZ_RESOURCES_DIR,
            prefix: prefix.to_string(),
            resource_group: None,
            region: region.to_string(),
            vars,
            workspace: Some(prefix.to_string()),
            implicit_destroy_required: true,
        }
    }
}

/// KMS vars every example needs, plus access tags where the example takes them.
fn encrypted_vars(
    resources: &PermanentResources,
    with_access_tags: bool,
) -> Result<Map<String, Value>, FixtureError> {
    let mut vars = Map::new();
    vars.insert(
        "existing_kms_instance_guid".into(),
        resources.require("hpcs_south")?.clone(),
    );
    vars.insert(
        "boot_volume_encryption_key".into(),
        resources.require("hpcs_south_root_key_crn")?.clone(),
    );
    if with_access_tags {
        vars.insert(
            "access_tags".into(),
            resources.require("accessTags")?.clone(),
        );
    }
    Ok(vars)
}
