//! Report formatting.

use anyhow::Result;
use colored::Colorize;
use tabled::{Table, Tabled};
use vsi_snapshot_verify::VerificationResult;

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

#[derive(Tabled)]
struct MismatchRow {
    #[tabled(rename = "FIELD")]
    field: String,
    #[tabled(rename = "EXPECTED")]
    expected: String,
    #[tabled(rename = "OBSERVED")]
    observed: String,
}

pub fn print_result(result: &VerificationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
    }
    Ok(())
}

fn render_table(result: &VerificationResult) -> String {
    let mut out = String::new();

    if result.passed() {
        out.push_str(&format!(
            "{} snapshot restore outputs match",
            "Success:".green().bold()
        ));
    } else {
        let rows: Vec<MismatchRow> = result
            .mismatches
            .iter()
            .map(|m| MismatchRow {
                field: m.field(),
                expected: m.expected(),
                observed: m.observed(),
            })
            .collect();
        out.push_str(&format!(
            "{} {} mismatch(es)\n{}",
            "Failed:".red().bold(),
            result.mismatches.len(),
            Table::new(rows)
        ));
    }

    let cardinality = result.cardinality.to_string();
    let cardinality = if result.cardinality.passed() {
        cardinality.as_str().dimmed()
    } else {
        cardinality.as_str().yellow()
    };
    out.push_str(&format!("\n{cardinality}"));
    out
}

fn render_json(result: &VerificationResult) -> Result<String> {
    let mut value = serde_json::to_value(result)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("passed".to_string(), serde_json::json!(result.passed()));
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Print a failed run as JSON so `--format json` consumers always get a document.
pub fn print_json_error(err: &anyhow::Error) {
    println!("{}", render_json_error(err));
}

fn render_json_error(err: &anyhow::Error) -> String {
    let value = serde_json::json!({
        "passed": false,
        "error": format!("{err:#}"),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// Print an error and its cause chain.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }
}
