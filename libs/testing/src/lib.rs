//! # vsi-testing
//!
//! Fixtures shared by the VSI module integration tests.
//!
//! Everything here is built once at suite setup and passed to each test case
//! by parameter:
//!
//! - [`PermanentResources`]: long-lived account resources loaded from YAML
//! - [`SuiteEnv`]: required and optional environment settings
//! - [`Scenario`]: Terraform directory, prefix and vars for one test case
//! - [`TeardownPolicy`]: whether to destroy resources after a test
//!
//! Provisioning itself is done by the external test orchestration; this
//! crate only describes what to provision and checks what came back.

mod env;
mod error;
mod resources;
mod scenario;
mod vpc;

pub use env::{SuiteEnv, TeardownPolicy, API_KEY_VAR, DO_NOT_DESTROY_VAR, RESOURCES_PATH_VAR};
pub use error::FixtureError;
pub use resources::{ExpectationKeys, PermanentResources, DEFAULT_RESOURCES_PATH};
pub use scenario::{
    unique_prefix, Scenario, BASIC_EXAMPLE_DIR, FSCLOUD_EXAMPLE_DIR, FSCLOUD_PREFIX,
    LANDING_ZONE_EXTENSION_DIR, REGION, RESOURCE_GROUP, SLZ_RESOURCES_DIR, UPGRADE_PREFIX,
};
pub use vpc::find_management_vpc_id;

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT_TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber. Safe to call from every test.
pub fn init_test_tracing() {
    INIT_TRACING.call_once(|| {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init()
            .ok();
    });
}
