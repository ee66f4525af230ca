//! vsi-verify - check saved apply outputs of a snapshot-restored VSI.
//!
//! Reads a `terraform output -json` document and an expectation file, and
//! reports every snapshot id that does not match.
//!
//! Exit codes: `0` pass, `1` mismatches found, `2` unreadable or malformed input.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vsi_snapshot_verify::{SnapshotRestoreVerifier, DEFAULT_MODULE_KEY};

mod load;
mod output;

use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "vsi-verify", version, about)]
struct Args {
    /// Apply outputs (`terraform output -json` or a flat JSON map).
    #[arg(long, short = 'o', value_name = "FILE")]
    outputs: PathBuf,

    /// Expected snapshot ids (JSON, or YAML for any other extension).
    #[arg(long, short = 'e', value_name = "FILE")]
    expectation: PathBuf,

    /// Output holding the VSI module's snapshot fields.
    #[arg(long, env = "VSI_VERIFY_MODULE_KEY", default_value = DEFAULT_MODULE_KEY)]
    module_key: String,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let outcome = run(&args);
    if let Err(err) = &outcome {
        output::print_error(err);
        if args.format == OutputFormat::Json {
            output::print_json_error(err);
        }
    }
    ExitCode::from(exit_code(&outcome))
}

fn exit_code(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Returns whether verification passed.
fn run(args: &Args) -> Result<bool> {
    let outputs = load::read_outputs(&args.outputs)?;
    let expectation = load::read_expectation(&args.expectation)?;
    info!(
        outputs = %args.outputs.display(),
        module_key = %args.module_key,
        volumes = expectation.volume_count(),
        "Verifying snapshot restore outputs"
    );

    let result = SnapshotRestoreVerifier::new()
        .with_module_key(&args.module_key)
        .verify(&outputs, &expectation)
        .with_context(|| format!("malformed outputs in {}", args.outputs.display()))?;

    output::print_result(&result, args.format)?;
    Ok(result.passed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXPECTATION: &str = r#"{
        "group_boot_snapshot_id": "r026-AAA",
        "volume_snapshot_ids": {"vsi-block-1": "r026-BBB", "vsi-block-2": "r026-CCC"}
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(outputs: &tempfile::NamedTempFile, expectation: &tempfile::NamedTempFile) -> Args {
        Args {
            outputs: outputs.path().to_path_buf(),
            expectation: expectation.path().to_path_buf(),
            module_key: DEFAULT_MODULE_KEY.to_string(),
            format: OutputFormat::Json,
        }
    }

    fn outputs_doc(boot: &str) -> String {
        format!(
            r#"{{"slz_vsi": {{"sensitive": false, "value": {{
                "consistency_group_boot_snapshot_id": "{boot}",
                "consistency_group_storage_snapshot_ids": {{
                    "vsi-block-1": "r026-BBB",
                    "vsi-block-2": "r026-CCC"
                }}
            }}}}}}"#
        )
    }

    #[test]
    fn test_run_passes_on_matching_outputs() {
        let outputs = write_temp(&outputs_doc("r026-AAA"));
        let expectation = write_temp(EXPECTATION);

        let outcome = run(&args(&outputs, &expectation));
        assert!(matches!(outcome, Ok(true)));
        assert_eq!(exit_code(&outcome), 0);
    }

    #[test]
    fn test_run_reports_mismatch() {
        let outputs = write_temp(&outputs_doc("r026-WRONG"));
        let expectation = write_temp(EXPECTATION);

        let outcome = run(&args(&outputs, &expectation));
        assert!(matches!(outcome, Ok(false)));
        assert_eq!(exit_code(&outcome), 1);
    }

    #[test]
    fn test_run_fails_on_missing_module_key() {
        let outputs = write_temp(&outputs_doc("r026-AAA"));
        let expectation = write_temp(EXPECTATION);
        let mut args = args(&outputs, &expectation);
        args.module_key = "vsi_restore".to_string();

        let outcome = run(&args);
        let err = outcome.as_ref().unwrap_err();
        assert!(err.to_string().starts_with("malformed outputs in"));
        assert!(format!("{err:#}").contains("missing required output key 'vsi_restore'"));
        assert_eq!(exit_code(&outcome), 2);
    }

    #[test]
    fn test_run_fails_on_unreadable_outputs() {
        let expectation = write_temp(EXPECTATION);
        let args = Args {
            outputs: expectation.path().with_extension("missing"),
            expectation: expectation.path().to_path_buf(),
            module_key: DEFAULT_MODULE_KEY.to_string(),
            format: OutputFormat::Table,
        };

        assert_eq!(exit_code(&run(&args)), 2);
    }
}
