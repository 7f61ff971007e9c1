//! Repair-aware evaluation pipeline
//!
//! Orchestrates validate → evaluate, inserting an automatic repair attempt
//! when (and only when) validation fails with a delimiter-class error:
//! counting-based balancing first, indentation inference as fallback, and
//! re-validation before any candidate is accepted. The terminal report
//! always carries an explicit `repaired` flag: evaluated code may differ
//! from what the caller submitted, and that fact must be surfaced.

use serde::{Deserialize, Serialize};

use crate::balance::{RepairOutcome, repair};
use crate::indent::repair_by_indent;
use crate::lint::{Linter, is_delimiter_error};
use crate::result::Result;

/// Kind of one evaluator output event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// An evaluated value
    Value,
    /// Text printed to standard output
    Out,
    /// Text printed to standard error
    Err,
    /// A linter finding surfaced alongside evaluation
    Lint,
}

/// One ordered output event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub kind: OutputKind,
    pub text: String,
}

impl Output {
    pub fn new(kind: OutputKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn value(text: impl Into<String>) -> Self {
        Self::new(OutputKind::Value, text)
    }

    pub fn out(text: impl Into<String>) -> Self {
        Self::new(OutputKind::Out, text)
    }

    pub fn err(text: impl Into<String>) -> Self {
        Self::new(OutputKind::Err, text)
    }

    pub fn lint(text: impl Into<String>) -> Self {
        Self::new(OutputKind::Lint, text)
    }
}

/// What one blocking evaluate call yields: ordered output events plus a
/// success/failure classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub outputs: Vec<Output>,
    pub error: bool,
}

/// The remote evaluation capability
///
/// One call is a single logical blocking operation; any polling or
/// interleaving behind it is the implementation's concern.
pub trait Evaluator {
    fn evaluate(&self, code: &str) -> Result<Evaluation>;
}

/// Terminal result of a repair-aware evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalReport {
    /// Output events in emission order
    pub outputs: Vec<Output>,
    /// Whether evaluation (or validation) failed
    pub error: bool,
    /// Whether the evaluated code was repaired before execution
    pub repaired: bool,
}

/// The orchestrator tying linter, repair strategies, and evaluator together
pub struct RepairPipeline<'a> {
    linter: &'a dyn Linter,
    evaluator: &'a dyn Evaluator,
}

impl<'a> RepairPipeline<'a> {
    pub fn new(linter: &'a dyn Linter, evaluator: &'a dyn Evaluator) -> Self {
        Self { linter, evaluator }
    }

    /// Validate, repairing delimiter-class failures, then evaluate
    pub fn evaluate_with_repair(&self, code: &str) -> Result<EvalReport> {
        let report = self.linter.lint(code);

        if !report.error {
            let evaluation = self.evaluator.evaluate(code)?;
            return Ok(self.finish(evaluation, &report.warnings, false));
        }

        if !is_delimiter_error(&report.report) {
            // Non-delimiter syntax errors are never auto-repaired: a repair
            // could silently rewrite code the author meant differently.
            tracing::debug!("validation failed with non-delimiter error; not repairing");
            return Ok(EvalReport {
                outputs: vec![Output::lint(report.report)],
                error: true,
                repaired: false,
            });
        }

        let candidate = self.repair_candidate(code);
        let Some(candidate) = candidate else {
            return Ok(EvalReport {
                outputs: vec![Output::lint(report.report)],
                error: true,
                repaired: false,
            });
        };

        let revalidation = self.linter.lint(&candidate);
        if revalidation.error {
            tracing::debug!("repair candidate failed re-validation");
            return Ok(EvalReport {
                outputs: vec![Output::lint(report.report)],
                error: true,
                repaired: false,
            });
        }

        tracing::info!("input repaired before evaluation");
        let evaluation = self.evaluator.evaluate(&candidate)?;
        Ok(self.finish(evaluation, &revalidation.warnings, true))
    }

    /// Counting-based balancing first; indentation inference when the
    /// balancer fails, changes nothing, or yields a candidate the linter
    /// rejects (counting can nest forms the author's layout contradicts)
    fn repair_candidate(&self, code: &str) -> Option<String> {
        if let RepairOutcome::Repaired { form, .. } = repair(code)
            && form != code
            && !self.linter.lint(&form).error
        {
            return Some(form);
        }
        repair_by_indent(code, self.linter)
    }

    fn finish(&self, evaluation: Evaluation, warnings: &[String], repaired: bool) -> EvalReport {
        let mut outputs = evaluation.outputs;
        for warning in warnings {
            outputs.push(Output::lint(warning.clone()));
        }
        EvalReport {
            outputs,
            error: evaluation.error,
            repaired,
        }
    }
}

/// Separator between formatted evaluation groups: 49 `=` wrapped in `*`
pub fn group_separator() -> String {
    format!("*{}*", "=".repeat(49))
}

/// Render outputs in the fixed convention: non-value lines verbatim, each
/// final value as `=> value`; one group per value, groups joined by the
/// separator line
pub fn format_outputs(outputs: &[Output]) -> String {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for output in outputs {
        match output.kind {
            OutputKind::Value => {
                current.push(format!("=> {}", output.text));
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(output.text.trim_end_matches('\n').to_string()),
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    let separator = format!("\n{}\n", group_separator());
    groups
        .iter()
        .map(|g| g.join("\n"))
        .collect::<Vec<_>>()
        .join(&separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{LintReport, SyntaxLinter};
    use std::cell::RefCell;

    /// Scripted evaluator recording what it was asked to evaluate
    struct FakeEvaluator {
        calls: RefCell<Vec<String>>,
    }

    impl FakeEvaluator {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Evaluator for FakeEvaluator {
        fn evaluate(&self, code: &str) -> Result<Evaluation> {
            self.calls.borrow_mut().push(code.to_string());
            Ok(match code {
                "(/ 1 0)" => Evaluation {
                    outputs: vec![Output::err("Divide by zero")],
                    error: true,
                },
                "(println \"first\") (+ 10 20)" => Evaluation {
                    outputs: vec![
                        Output::out("first\n"),
                        Output::value("nil"),
                        Output::value("30"),
                    ],
                    error: false,
                },
                _ => Evaluation {
                    outputs: vec![Output::value("ok")],
                    error: false,
                },
            })
        }
    }

    #[test]
    fn valid_input_is_not_repaired() {
        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&SyntaxLinter, &evaluator);
        let report = pipeline.evaluate_with_repair("(+ 1 2)").unwrap();
        assert!(!report.error);
        assert!(!report.repaired);
        assert_eq!(evaluator.calls(), vec!["(+ 1 2)"]);
    }

    #[test]
    fn missing_closer_is_repaired_then_evaluated() {
        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&SyntaxLinter, &evaluator);
        let report = pipeline
            .evaluate_with_repair("(defn hello [name] (println name)")
            .unwrap();
        assert!(!report.error);
        assert!(report.repaired, "repair must be surfaced to the caller");
        assert_eq!(
            evaluator.calls(),
            vec!["(defn hello [name] (println name))"]
        );
    }

    #[test]
    fn extra_closer_is_repaired_then_evaluated() {
        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&SyntaxLinter, &evaluator);
        let report = pipeline
            .evaluate_with_repair("(defn hello [name] (println name)))")
            .unwrap();
        assert!(report.repaired);
        assert_eq!(
            evaluator.calls(),
            vec!["(defn hello [name] (println name))"]
        );
        assert!(!report.error);
    }

    #[test]
    fn non_delimiter_error_is_never_repaired() {
        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&SyntaxLinter, &evaluator);
        let report = pipeline
            .evaluate_with_repair("(defn hello [123] (println name))")
            .unwrap();
        assert!(report.error);
        assert!(!report.repaired);
        assert!(evaluator.calls().is_empty(), "must not evaluate bad input");
        assert!(
            report
                .outputs
                .iter()
                .any(|o| o.kind == OutputKind::Lint && o.text.contains("Invalid binding form"))
        );
    }

    #[test]
    fn runtime_error_is_not_a_repair_case() {
        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&SyntaxLinter, &evaluator);
        let report = pipeline.evaluate_with_repair("(/ 1 0)").unwrap();
        assert!(report.error);
        assert!(!report.repaired);
        assert_eq!(report.outputs, vec![Output::err("Divide by zero")]);
    }

    #[test]
    fn multiple_forms_evaluate_in_order() {
        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&SyntaxLinter, &evaluator);
        let report = pipeline
            .evaluate_with_repair("(println \"first\") (+ 10 20)")
            .unwrap();
        assert!(!report.error);
        assert_eq!(report.outputs[0], Output::out("first\n"));
        assert_eq!(report.outputs.last(), Some(&Output::value("30")));
    }

    #[test]
    fn failed_revalidation_reports_original_error() {
        /// Linter that never accepts anything, with a delimiter-class report
        struct Stonewall;
        impl Linter for Stonewall {
            fn lint(&self, _source: &str) -> LintReport {
                LintReport {
                    error: true,
                    report: "Unmatched bracket: unexpected `)`".into(),
                    warnings: Vec::new(),
                }
            }
            fn lint_delims(&self, source: &str) -> LintReport {
                self.lint(source)
            }
        }

        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&Stonewall, &evaluator);
        let report = pipeline.evaluate_with_repair("(a").unwrap();
        assert!(report.error);
        assert!(!report.repaired);
        assert!(evaluator.calls().is_empty());
        assert_eq!(
            report.outputs,
            vec![Output::lint("Unmatched bracket: unexpected `)`")]
        );
    }

    #[test]
    fn mismatched_brackets_repair_via_rewrite() {
        // Balancer counts report 0/0 here, but the closer was rewritten,
        // so the candidate still goes through re-validation and evaluation.
        let evaluator = FakeEvaluator::new();
        let pipeline = RepairPipeline::new(&SyntaxLinter, &evaluator);
        let report = pipeline.evaluate_with_repair("(a]").unwrap();
        assert!(report.repaired);
        assert_eq!(evaluator.calls(), vec!["(a)"]);
        assert!(!report.error);
    }

    #[test]
    fn format_single_group() {
        let outputs = vec![Output::out("first\n"), Output::value("30")];
        assert_eq!(format_outputs(&outputs), "first\n=> 30");
    }

    #[test]
    fn format_joins_groups_with_separator() {
        let outputs = vec![
            Output::out("first\n"),
            Output::value("nil"),
            Output::value("30"),
        ];
        let expected = format!(
            "first\n=> nil\n{}\n=> 30",
            group_separator()
        );
        assert_eq!(format_outputs(&outputs), expected);
    }

    #[test]
    fn separator_shape() {
        let sep = group_separator();
        assert_eq!(sep.len(), 51);
        assert!(sep.starts_with("*="));
        assert!(sep.ends_with("=*"));
        assert_eq!(sep.matches('=').count(), 49);
    }
}
