//! Command implementations for the KINTSU CLI

use std::io::Read;
use std::path::{Path, PathBuf};

use kintsu_core::{
    EditOp, KintsuError, Linter, RepairOutcome, Result, SyntaxLinter, edit_matching,
    is_delimiter_error, parse_source, repair, repair_by_indent,
};
use tracing::{debug, info};

use crate::OutputFormat;
use crate::output;

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| KintsuError::io_error(path, e))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).map_err(|e| KintsuError::io_error(path, e))
    }
}

/// Print the result, or write it back when `--write` was given on a file
fn emit(path: &Path, text: &str, repaired: bool, write: bool, format: OutputFormat) -> Result<()> {
    if write && !is_stdin(path) {
        std::fs::write(path, text).map_err(|e| KintsuError::io_error(path, e))?;
        info!("wrote {}", path.display());
        Ok(())
    } else {
        output::print_repair(text, repaired, format)
    }
}

/// Check command implementation
pub fn check_command(input: PathBuf, format: OutputFormat, delims_only: bool) -> Result<()> {
    debug!("Running check command on {}", input.display());
    let source = read_input(&input)?;

    let linter = SyntaxLinter::new();
    let report = if delims_only {
        linter.lint_delims(&source)
    } else {
        linter.lint(&source)
    };

    output::print_lint_report(&report, format)?;

    if report.error {
        std::process::exit(1);
    }
    Ok(())
}

/// Repair command implementation
pub fn repair_command(input: PathBuf, write: bool, format: OutputFormat) -> Result<()> {
    debug!("Running repair command on {}", input.display());
    let source = read_input(&input)?;

    let linter = SyntaxLinter::new();
    let before = linter.lint(&source);
    if !before.error {
        return emit(&input, &source, false, write, format);
    }

    if !is_delimiter_error(&before.report) {
        return Err(KintsuError::parse_error(before.report, 0));
    }

    let candidate = match repair(&source) {
        RepairOutcome::Repaired { form, .. }
            if form != source && !linter.lint(&form).error =>
        {
            Some(form)
        }
        _ => repair_by_indent(&source, &linter),
    };
    let Some(candidate) = candidate else {
        return Err(KintsuError::parse_error(before.report, 0));
    };

    emit(&input, &candidate, true, write, format)
}

/// Edit command implementation
pub fn edit_command(
    input: PathBuf,
    pattern: String,
    replacement: String,
    op: EditOp,
    write: bool,
) -> Result<()> {
    debug!(
        "Running edit command on {} with pattern {pattern}",
        input.display()
    );
    let source = read_input(&input)?;

    let (root, errors) = parse_source(&source);
    if let Some(err) = errors.first() {
        return Err(KintsuError::parse_error(err.message.clone(), err.span.start));
    }

    let outcome = edit_matching(&root, &pattern, op, &replacement)?;
    debug!("edit focus at {:?}", outcome.focus.text_range());

    let edited = outcome.root.text().to_string();
    if write && !is_stdin(&input) {
        std::fs::write(&input, &edited).map_err(|e| KintsuError::io_error(&input, e))?;
        info!("wrote {}", input.display());
    } else {
        print!("{edited}");
    }
    Ok(())
}
