//! Output rendering for the KINTSU CLI

use kintsu_core::{LintReport, Result, is_delimiter_error};
use serde_json::json;

use crate::OutputFormat;

/// Render a validation report to stdout
pub fn print_lint_report(report: &LintReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if report.error {
                for line in report.report.lines() {
                    println!("error: {line}");
                }
            }
            for warning in &report.warnings {
                println!("warning: {warning}");
            }
            if !report.error {
                println!("ok");
            }
        }
        OutputFormat::Json => {
            let payload = json!({
                "error": report.error,
                "report": report.report,
                "warnings": report.warnings,
                "delimiter_error": report.error && is_delimiter_error(&report.report),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}

/// Render the result of a repair to stdout
pub fn print_repair(text: &str, repaired: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print!("{text}"),
        OutputFormat::Json => {
            let payload = json!({ "text": text, "repaired": repaired });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}
