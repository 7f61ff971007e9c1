//! Semantic validation and delimiter-error classification
//!
//! The [`Linter`] trait is the validation capability every repair decision
//! hangs off: it gates whether repair is attempted at all and whether a
//! repair candidate is accepted. It is passed explicitly into consumers
//! rather than living behind a global, so tests can substitute fakes.
//!
//! [`is_delimiter_error`] classifies a report as a delimiter-class failure
//! by matching a fixed, case-sensitive set of diagnostic patterns. Only
//! delimiter-class errors may trigger automatic repair; anything else
//! (malformed literals, bad binding forms) must surface untouched.

use std::sync::LazyLock;

use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::cst::{
    SexpSyntaxKind, SexpSyntaxNode, SexpSyntaxNodeExt, parse_source,
};

/// Result of validating a piece of source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    /// Whether validation failed
    pub error: bool,
    /// Human-readable diagnostics, one per line
    pub report: String,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn clean() -> Self {
        Self {
            error: false,
            report: String::new(),
            warnings: Vec::new(),
        }
    }
}

/// Validation capability consumed by the repair pipeline
///
/// Implementations must be cheap to call repeatedly; every repair attempt
/// re-validates its candidate through this interface.
pub trait Linter {
    /// Full validation: syntax plus shallow form checks
    fn lint(&self, source: &str) -> LintReport;

    /// Validation restricted to delimiter balance
    fn lint_delims(&self, source: &str) -> LintReport;
}

/// Diagnostic patterns that identify a delimiter-class error
///
/// Case-sensitive, matched anywhere in the report text. The set is a fixed
/// external contract shared with the validators this engine interoperates
/// with; do not reword.
static DELIMITER_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        "Unmatched bracket",
        "Found an opening .* with no matching",
        "Expected a .* to match",
        "Mismatched bracket",
        "Unexpected EOF while reading",
        "Unmatched opening",
        "Unmatched closing",
    ])
    .expect("delimiter patterns are valid regexes")
});

/// Classify a validation report as a delimiter/bracket-matching failure
pub fn is_delimiter_error(report: &str) -> bool {
    DELIMITER_PATTERNS.is_match(report)
}

/// The built-in CST-backed linter
///
/// Syntax diagnostics come verbatim from the parser; on top of that a few
/// shallow form checks cover the class of errors that are syntactically
/// well-formed but still invalid, such as a number in a binding vector.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxLinter;

impl SyntaxLinter {
    pub fn new() -> Self {
        Self
    }
}

impl Linter for SyntaxLinter {
    fn lint(&self, source: &str) -> LintReport {
        let (tree, errors) = parse_source(source);
        let mut lines: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
        let mut warnings = Vec::new();

        // Form checks only make sense on a tree that parsed.
        if errors.is_empty() {
            check_binding_forms(&tree, &mut lines, &mut warnings);
        }

        LintReport {
            error: !lines.is_empty(),
            report: lines.join("\n"),
            warnings,
        }
    }

    fn lint_delims(&self, source: &str) -> LintReport {
        let (_, errors) = parse_source(source);
        let lines: Vec<String> = errors
            .iter()
            .filter(|e| e.kind.is_delimiter())
            .map(|e| e.message.clone())
            .collect();
        LintReport {
            error: !lines.is_empty(),
            report: lines.join("\n"),
            warnings: Vec::new(),
        }
    }
}

const PARAM_BINDERS: &[&str] = &["defn", "defn-", "defmacro", "fn"];
const PAIR_BINDERS: &[&str] = &["let", "loop", "binding", "if-let", "when-let"];

/// Walk the tree checking binding vectors of the common binding forms
fn check_binding_forms(tree: &SexpSyntaxNode, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    for node in tree.descendants() {
        if node.kind() != SexpSyntaxKind::List {
            continue;
        }
        let forms = node.form_children();
        let Some(head) = forms.first().and_then(|f| f.atom_text()) else {
            continue;
        };

        if PARAM_BINDERS.contains(&head.as_str()) {
            if let Some(params) = forms.iter().find(|f| f.kind() == SexpSyntaxKind::Vector) {
                check_binding_vector(params, false, errors, warnings);
            }
        } else if PAIR_BINDERS.contains(&head.as_str()) {
            if let Some(bindings) = forms.get(1) {
                if bindings.kind() == SexpSyntaxKind::Vector {
                    check_binding_vector(bindings, true, errors, warnings);
                } else {
                    errors.push(format!(
                        "{head} requires a vector for its binding"
                    ));
                }
            }
        }
    }
}

fn check_binding_vector(
    vector: &SexpSyntaxNode,
    pairwise: bool,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let elements = vector.form_children();

    if pairwise && elements.len() % 2 != 0 {
        errors.push("Binding vector requires an even number of forms".to_string());
    }

    let mut seen: Vec<String> = Vec::new();
    for (idx, element) in elements.iter().enumerate() {
        if pairwise && idx % 2 != 0 {
            continue; // value position, anything goes
        }
        if !is_binding_form(element) {
            errors.push(format!("Invalid binding form: {}", element.trimmed_text()));
        }
        if let Some(name) = symbol_text(element) {
            if seen.contains(&name) {
                warnings.push(format!("Duplicate binding name: {name}"));
            } else {
                seen.push(name);
            }
        }
    }
}

/// A valid binding target: a non-keyword symbol, `&`, or a destructuring
/// vector/map
fn is_binding_form(node: &SexpSyntaxNode) -> bool {
    match node.kind() {
        SexpSyntaxKind::Vector | SexpSyntaxKind::Map => true,
        SexpSyntaxKind::Atom => symbol_text(node).is_some() || node.trimmed_text() == "&",
        _ => false,
    }
}

fn symbol_text(node: &SexpSyntaxNode) -> Option<String> {
    if node.atom_token_kind() != Some(SexpSyntaxKind::Symbol) {
        return None;
    }
    let text = node.atom_text()?;
    if text.starts_with(':') || text == "&" {
        return None;
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_source_lints_clean() {
        let report = SyntaxLinter.lint("(defn hello [name] (println name))");
        assert!(!report.error);
        assert!(report.report.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_closer_is_delimiter_class() {
        let report = SyntaxLinter.lint("(defn hello [name] (println name)");
        assert!(report.error);
        assert!(is_delimiter_error(&report.report));
    }

    #[test]
    fn invalid_binding_is_not_delimiter_class() {
        let report = SyntaxLinter.lint("(defn hello [123] (println name))");
        assert!(report.error);
        assert!(report.report.contains("Invalid binding form: 123"));
        assert!(!is_delimiter_error(&report.report));
    }

    #[test]
    fn lint_delims_ignores_form_errors() {
        let report = SyntaxLinter.lint_delims("(defn hello [123] (println name))");
        assert!(!report.error);

        let report = SyntaxLinter.lint_delims("(a [b)");
        assert!(report.error);
        assert!(is_delimiter_error(&report.report));
    }

    #[test]
    fn odd_binding_count_is_an_error() {
        let report = SyntaxLinter.lint("(let [x] x)");
        assert!(report.error);
        assert!(report.report.contains("even number of forms"));
    }

    #[test]
    fn duplicate_binding_warns() {
        let report = SyntaxLinter.lint("(let [x 1 x 2] x)");
        assert!(!report.error);
        assert_eq!(report.warnings, vec!["Duplicate binding name: x"]);
    }

    #[test]
    fn destructuring_binds_are_accepted() {
        let report = SyntaxLinter.lint("(defn f [{:keys [a b]} [x y] & rest] a)");
        assert!(!report.error, "report: {}", report.report);
    }

    #[test]
    fn classifier_matches_fixed_patterns() {
        for report in [
            "Unmatched bracket: unexpected `)`",
            "Found an opening `(` with no matching close",
            "Expected a `]` to match `[`, found `)`",
            "Mismatched bracket somewhere",
            "Unexpected EOF while reading: unclosed `(`",
            "Unmatched opening paren",
            "Unmatched closing paren",
        ] {
            assert!(is_delimiter_error(report), "should classify: {report}");
        }

        for report in [
            "Invalid binding form: 123",
            "unmatched bracket", // case-sensitive
            "Divide by zero",
            "",
        ] {
            assert!(!is_delimiter_error(report), "should not classify: {report}");
        }
    }
}
