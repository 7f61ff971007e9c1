//! End-to-end repair and evaluation scenarios
//!
//! These tests drive the whole engine through its public API: validation,
//! delimiter repair, and the repair-aware pipeline, with a scripted
//! evaluator standing in for a live runtime.

use kintsu_core::{
    Evaluation, Evaluator, Linter, Output, OutputKind, RepairPipeline, Result, SyntaxLinter,
    format_outputs,
};
use std::cell::RefCell;

/// Evaluator that records its inputs and replays canned responses
struct ScriptedEvaluator {
    calls: RefCell<Vec<String>>,
}

impl ScriptedEvaluator {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Evaluator for ScriptedEvaluator {
    fn evaluate(&self, code: &str) -> Result<Evaluation> {
        self.calls.borrow_mut().push(code.to_string());
        Ok(match code {
            "(defn hello [name] (println name))" => Evaluation {
                outputs: vec![Output::value("#'user/hello")],
                error: false,
            },
            "(/ 1 0)" => Evaluation {
                outputs: vec![Output::err("Divide by zero")],
                error: true,
            },
            "(do (println \"first\") (+ 10 20))" => Evaluation {
                outputs: vec![Output::out("first\n"), Output::value("30")],
                error: false,
            },
            other => Evaluation {
                outputs: vec![Output::value(format!("evaluated {other}"))],
                error: false,
            },
        })
    }
}

fn pipeline_with(evaluator: &ScriptedEvaluator) -> RepairPipeline<'_> {
    RepairPipeline::new(&SyntaxLinter, evaluator)
}

/// A definition missing its final closer is repaired, evaluated, and the
/// repair is reported to the caller
#[test]
fn missing_closer_scenario() {
    let evaluator = ScriptedEvaluator::new();
    let report = pipeline_with(&evaluator)
        .evaluate_with_repair("(defn hello [name] (println name)")
        .unwrap();

    assert_eq!(evaluator.calls(), vec!["(defn hello [name] (println name))"]);
    assert!(report.repaired);
    assert!(!report.error);
    assert_eq!(report.outputs, vec![Output::value("#'user/hello")]);
    assert_eq!(format_outputs(&report.outputs), "=> #'user/hello");
}

/// A surplus closer is dropped and the remainder evaluates normally
#[test]
fn extra_closer_scenario() {
    let evaluator = ScriptedEvaluator::new();
    let report = pipeline_with(&evaluator)
        .evaluate_with_repair("(defn hello [name] (println name)))")
        .unwrap();

    assert_eq!(evaluator.calls(), vec!["(defn hello [name] (println name))"]);
    assert!(report.repaired);
    assert!(!report.error);
}

/// A number in a parameter vector is a validation error, never a repair
/// target, and the evaluator is never reached
#[test]
fn invalid_binding_scenario() {
    let evaluator = ScriptedEvaluator::new();
    let report = pipeline_with(&evaluator)
        .evaluate_with_repair("(defn hello [123] (println name))")
        .unwrap();

    assert!(evaluator.calls().is_empty());
    assert!(report.error);
    assert!(!report.repaired);
    assert_eq!(report.outputs.len(), 1);
    assert_eq!(report.outputs[0].kind, OutputKind::Lint);
    assert!(report.outputs[0].text.contains("Invalid binding form: 123"));
}

/// A runtime failure flows through untouched: no repair, error surfaced
#[test]
fn runtime_error_scenario() {
    let evaluator = ScriptedEvaluator::new();
    let report = pipeline_with(&evaluator)
        .evaluate_with_repair("(/ 1 0)")
        .unwrap();

    assert!(report.error);
    assert!(!report.repaired);
    assert_eq!(report.outputs, vec![Output::err("Divide by zero")]);
}

/// Printed output precedes the value, and formatting renders them as
/// verbatim lines followed by `=> value`
#[test]
fn printed_output_scenario() {
    let evaluator = ScriptedEvaluator::new();
    let report = pipeline_with(&evaluator)
        .evaluate_with_repair("(do (println \"first\") (+ 10 20))")
        .unwrap();

    assert!(!report.error);
    assert!(!report.repaired);
    assert_eq!(
        report.outputs,
        vec![Output::out("first\n"), Output::value("30")]
    );
    assert_eq!(format_outputs(&report.outputs), "first\n=> 30");
}

/// Indentation carries the repair when counting nests wrongly: counting
/// would pull `(g x)` into the binding vector, which re-validation
/// rejects; the layout says the vector closes on its own line
#[test]
fn indentation_informs_closer_placement() {
    let source = "(let [x 1\n(g x)";
    let linter = SyntaxLinter;
    assert!(linter.lint(source).error);

    let evaluator = ScriptedEvaluator::new();
    let report = pipeline_with(&evaluator)
        .evaluate_with_repair(source)
        .unwrap();

    assert!(report.repaired);
    assert_eq!(evaluator.calls(), vec!["(let [x 1])\n(g x)"]);
}

/// Valid multi-line source passes through byte-for-byte
#[test]
fn valid_source_untouched() {
    let source = "(ns demo.core)\n\n(defn f\n  [x]\n  ;; doubling\n  (* 2 x))\n";
    let evaluator = ScriptedEvaluator::new();
    let report = pipeline_with(&evaluator)
        .evaluate_with_repair(source)
        .unwrap();

    assert!(!report.repaired);
    assert_eq!(evaluator.calls(), vec![source.to_string()]);
}
