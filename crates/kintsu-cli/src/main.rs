//! KINTSU CLI
//!
//! Command-line interface for the KINTSU structural repair toolkit

mod commands; // Contains current commands: check, repair, edit
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use kintsu_core::{Result, init_tracing};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "kintsu")]
#[command(about = "KINTSU: structural repair and pattern editing for s-expression source")]
#[command(version = kintsu_core::VERSION)]
#[command(
    long_about = "KINTSU validates, repairs, and structurally edits Lisp-family source text\n\
without discarding a single byte the author wrote.\n\
\n\
Examples:\n  \
kintsu check src/core.clj            # Validate a file\n  \
kintsu check - < snippet.clj         # Validate standard input\n  \
kintsu repair --write src/core.clj   # Repair unbalanced delimiters in place\n  \
kintsu edit src/core.clj -p '(defn handler *)' -r '(defn handler [req] req)'"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate source text and report delimiter and form errors
    #[command(alias = "lint")]
    Check {
        /// File to check, or `-` for standard input
        #[arg(help = "File to check, or `-` for standard input")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,

        /// Restrict validation to delimiter balance
        #[arg(long, help = "Skip form checks, validate delimiter balance only")]
        delims_only: bool,
    },

    /// Repair unbalanced delimiters, balancing first and falling back to
    /// indentation inference
    Repair {
        /// File to repair, or `-` for standard input
        #[arg(help = "File to repair, or `-` for standard input")]
        input: PathBuf,

        /// Write the repaired text back to the file
        #[arg(long, help = "Write repaired text back to the file")]
        write: bool,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,
    },

    /// Apply a structural edit at the first form matching a pattern
    Edit {
        /// File to edit, or `-` for standard input
        #[arg(help = "File to edit, or `-` for standard input")]
        input: PathBuf,

        /// Pattern with `?` (one form) and `*` (zero or more forms) wildcards
        #[arg(short, long, help = "Match pattern, e.g. \"(defn handler *)\"")]
        pattern: String,

        /// Replacement source text, one or more forms
        #[arg(short, long, help = "Replacement source text")]
        replacement: String,

        /// Where the replacement goes relative to the match
        #[arg(long, value_enum, default_value = "replace", help = "Edit operation")]
        op: EditAction,

        /// Write the edited text back to the file
        #[arg(long, help = "Write edited text back to the file")]
        write: bool,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for programmatic consumption
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EditAction {
    /// Replace the matched form
    Replace,
    /// Insert before the matched form
    InsertBefore,
    /// Insert after the matched form
    InsertAfter,
}

impl From<EditAction> for kintsu_core::EditOp {
    fn from(action: EditAction) -> Self {
        match action {
            EditAction::Replace => kintsu_core::EditOp::Replace,
            EditAction::InsertBefore => kintsu_core::EditOp::InsertBefore,
            EditAction::InsertAfter => kintsu_core::EditOp::InsertAfter,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "kintsu_core=error,kintsu_cli=error", // Only errors by default
        1 => "kintsu_core=warn,kintsu_cli=warn",   // Warnings on first -v
        2 => "kintsu_core=info,kintsu_cli=info",   // Info on -vv
        3 => "kintsu_core=debug,kintsu_cli=debug", // Debug on -vvv
        _ => "kintsu_core=trace,kintsu_cli=trace", // Trace on -vvvv+
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    match run_command(cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("kintsu failed: {}", e);
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Check {
            input,
            format,
            delims_only,
        }) => commands::check_command(input, format, delims_only),

        Some(Commands::Repair {
            input,
            write,
            format,
        }) => commands::repair_command(input, write, format),

        Some(Commands::Edit {
            input,
            pattern,
            replacement,
            op,
            write,
        }) => commands::edit_command(input, pattern, replacement, op.into(), write),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("kintsu {}", kintsu_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", kintsu_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
