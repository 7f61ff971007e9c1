//! Kintsu Core
//!
//! Structural repair and pattern-edit engine for Lisp-family source text.
//! This crate provides the fundamental components for tokenizing, balancing,
//! repairing, matching, and editing s-expression source while preserving
//! every byte the author wrote.

pub mod balance;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod edit;
pub mod error;
pub mod indent;
pub mod lint;
pub mod pattern;
pub mod pipeline;
pub mod result;
pub mod tokenize;

// Re-export commonly used types
pub use balance::{RepairOutcome, closing_for, repair};
pub use cst::{
    ParseError, ParseErrorKind, ParsedForm, SexpLanguage, SexpSyntaxKind, SexpSyntaxNode,
    SexpSyntaxNodeExt, parse_one, parse_source,
};
pub use edit::{EditOp, EditOutcome, apply_edit, edit_matching};
pub use error::{ErrorKind, KintsuError};
pub use indent::repair_by_indent;
pub use lint::{LintReport, Linter, SyntaxLinter, is_delimiter_error};
pub use pattern::{Pattern, find_all, find_first};
pub use pipeline::{
    EvalReport, Evaluation, Evaluator, Output, OutputKind, RepairPipeline, format_outputs,
    group_separator,
};
pub use result::Result;
pub use tokenize::{Token, tokenize};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kintsu_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
