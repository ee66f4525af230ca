use serde::Deserialize;

use crate::error::FixtureError;

#[derive(Debug, Deserialize)]
struct VpcEntry {
    vpc_id: String,
    vpc_name: String,
}

/// Find the management VPC id in a `vpc_data` output.
///
/// The landing zone names it `<prefix>-management-vpc`. When several entries
/// share that name the last one wins.
pub fn find_management_vpc_id(
    vpc_data_json: &str,
    prefix: &str,
) -> Result<Option<String>, FixtureError> {
    let vpcs: Vec<VpcEntry> =
        serde_json::from_str(vpc_data_json).map_err(|e| FixtureError::Output {
            output: "vpc_data",
            detail: e.to_string(),
        })?;

    let wanted = format!("{prefix}-management-vpc");
    Ok(vpcs
        .into_iter()
        .rev()
        .find(|vpc| vpc.vpc_name == wanted)
        .map(|vpc| vpc.vpc_id))
}
