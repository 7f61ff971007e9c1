//! Indentation-driven repair (fallback strategy)
//!
//! Re-derives trailing closing delimiters from indentation structure
//! instead of counting: trailing closers on each code line are dropped and
//! re-inserted at the point where the next code line's indentation says the
//! enclosing forms end. Delimiter counting is semantics-agnostic and can
//! produce structurally valid but wrongly nested output; this strategy
//! infers the nesting the author's formatting implies, at the price of
//! failing on unconventionally formatted input.
//!
//! A candidate is only accepted after the linter re-validates it; when the
//! engine or the re-validation fails, the strategy yields `None` and the
//! caller falls through.

use crate::balance::{closing_for, is_close_char, is_open_char};
use crate::lint::Linter;

/// Repair text by indentation inference, gated by re-validation
pub fn repair_by_indent(text: &str, linter: &dyn Linter) -> Option<String> {
    let candidate = infer_closers(text)?;
    let report = linter.lint(&candidate);
    if report.error {
        tracing::debug!("indentation candidate rejected by re-validation");
        return None;
    }
    Some(candidate)
}

/// A processed line: code portion, trailing comment, and the original line
/// terminator (preserved verbatim, so CRLF input stays CRLF)
struct OutLine<'a> {
    code: String,
    comment: &'a str,
    ending: &'a str,
    /// Whether closers may attach to the end of this line
    takes_closers: bool,
}

/// The indentation engine itself: returns the corrected text, or `None` if
/// the input defeats line-oriented scanning (e.g. a string running to EOF)
fn infer_closers(text: &str) -> Option<String> {
    let mut out: Vec<OutLine> = Vec::new();
    // Stack of (opener, column where it appeared)
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut in_string = false;

    for raw in text.split_inclusive('\n') {
        let (line, ending) = split_line_ending(raw);
        if in_string {
            // Continuation of a multi-line string; delimiters are opaque.
            in_string = !string_closes_on(line);
            out.push(OutLine {
                code: line.to_string(),
                comment: "",
                ending,
                takes_closers: false,
            });
            continue;
        }

        let indent = line.chars().take_while(|c| *c == ' ' || *c == '\t').count();
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            out.push(OutLine {
                code: line.to_string(),
                comment: "",
                ending,
                takes_closers: false,
            });
            continue;
        }

        // Indentation at or left of an opener's column closes that opener
        // at the end of the previous code line.
        while let Some(&(open, col)) = stack.last() {
            if col >= indent {
                stack.pop();
                append_closer(&mut out, closing_for(open)?);
            } else {
                break;
            }
        }

        let (code, comment) = split_comment(line);
        // When a string is still open at end of line, the trailing
        // characters are string content, not structure; leave them alone.
        let code = if scan_line(&code, &mut Vec::new()) {
            code
        } else {
            strip_trailing_closers(code)
        };
        in_string = scan_line(&code, &mut stack);

        out.push(OutLine {
            code,
            comment,
            ending,
            takes_closers: !in_string,
        });
    }

    if in_string {
        return None; // unterminated string; not an indentation problem
    }

    while let Some((open, _)) = stack.pop() {
        append_closer(&mut out, closing_for(open)?);
    }

    let mut result = String::new();
    for line in &out {
        result.push_str(&line.code);
        result.push_str(line.comment);
        result.push_str(line.ending);
    }
    Some(result)
}

/// Split a raw line into its text and its terminator (`\n`, `\r\n`, or
/// none at EOF)
fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

/// Append a closing delimiter to the most recent line that can take one
fn append_closer(out: &mut [OutLine<'_>], close: char) {
    if let Some(line) = out.iter_mut().rev().find(|l| l.takes_closers) {
        line.code.push(close);
    }
}

/// Split a line into code and comment portions, respecting strings and
/// character literals
fn split_comment(line: &str) -> (String, &str) {
    let mut in_string = false;
    let mut escaped = false;
    let mut prev_backslash = false;
    for (idx, c) in line.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if prev_backslash {
            prev_backslash = false;
            continue;
        }
        match c {
            '"' => in_string = true,
            '\\' => prev_backslash = true,
            ';' => return (line[..idx].to_string(), &line[idx..]),
            _ => {}
        }
    }
    (line.to_string(), "")
}

/// Remove the trailing run of closers (and surrounding whitespace) from a
/// code line; they get re-derived from indentation
fn strip_trailing_closers(mut code: String) -> String {
    loop {
        let trimmed_len = code.trim_end().len();
        code.truncate(trimmed_len);
        match code.chars().last() {
            Some(c) if is_close_char(c) && !ends_in_char_literal(&code) => {
                code.pop();
            }
            _ => break,
        }
    }
    code
}

/// Whether the code text ends in a character literal like `\)`
fn ends_in_char_literal(code: &str) -> bool {
    let mut chars = code.chars().rev();
    chars.next();
    chars.next() == Some('\\')
}

/// Scan a code line, pushing openers (with their columns) and matching
/// mid-line closers. Returns whether a string is still open at end of line.
fn scan_line(code: &str, stack: &mut Vec<(char, usize)>) -> bool {
    let mut in_string = false;
    let mut escaped = false;
    let mut skip_char_literal = false;
    let mut col = 0usize;

    for c in code.chars() {
        let here = col;
        col += 1;
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if skip_char_literal {
            skip_char_literal = false;
            continue;
        }
        match c {
            '"' => in_string = true,
            '\\' => skip_char_literal = true,
            c if is_open_char(c) => stack.push((c, here)),
            c if is_close_char(c) => {
                // Mid-line closer: closes the most recent opener.
                stack.pop();
            }
            _ => {}
        }
    }
    in_string
}

/// Whether a string that was open at start of line closes on this line
fn string_closes_on(line: &str) -> bool {
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::SyntaxLinter;

    fn fix(text: &str) -> Option<String> {
        repair_by_indent(text, &SyntaxLinter)
    }

    #[test]
    fn closes_by_indentation() {
        let src = "(defn hello [name]\n  (println name)";
        assert_eq!(
            fix(src).as_deref(),
            Some("(defn hello [name]\n  (println name))")
        );
    }

    #[test]
    fn drops_surplus_closers() {
        let src = "(defn hello [name]\n  (println name))))";
        assert_eq!(
            fix(src).as_deref(),
            Some("(defn hello [name]\n  (println name))")
        );
    }

    #[test]
    fn respects_sibling_forms() {
        let src = "(defn a []\n  1)\n(defn b []\n  2";
        assert_eq!(fix(src).as_deref(), Some("(defn a []\n  1)\n(defn b []\n  2)"));
    }

    #[test]
    fn no_op_on_balanced_input() {
        let src = "(defn hello [name]\n  (println name))\n";
        assert_eq!(fix(src).as_deref(), Some(src));
    }

    #[test]
    fn comment_lines_do_not_close_forms() {
        let src = "(defn a []\n  ; note\n  1";
        assert_eq!(fix(src).as_deref(), Some("(defn a []\n  ; note\n  1)"));
    }

    #[test]
    fn unterminated_string_falls_through() {
        assert_eq!(fix("(str \"oops"), None);
    }

    #[test]
    fn rejected_candidate_falls_through() {
        // Structurally repairable, but the binding error survives repair,
        // so re-validation rejects the candidate.
        assert_eq!(fix("(defn f [123]\n  1"), None);
    }

    #[test]
    fn delimiters_in_strings_are_opaque() {
        let src = "(println \"unbalanced ) ] here\"";
        assert_eq!(fix(src).as_deref(), Some("(println \"unbalanced ) ] here\")"));
    }

    #[test]
    fn multiline_string_content_is_not_stripped() {
        // The `))` before the line break is string content, not structure.
        let src = "(def x \"ab))\ncd\")";
        assert_eq!(fix(src).as_deref(), Some(src));
    }

    #[test]
    fn repairs_around_multiline_string() {
        let src = "(def x \"a)\nb\")\n(def y 1";
        assert_eq!(fix(src).as_deref(), Some("(def x \"a)\nb\")\n(def y 1)"));
    }

    #[test]
    fn string_spanning_candidate_still_revalidated() {
        // String content survives intact, and the leftover odd binding
        // vector makes re-validation reject the candidate.
        let src = "(let [x \"ab)\ncd\"\n      y]\n  x";
        assert_eq!(fix(src), None);
    }

    #[test]
    fn preserves_crlf_line_endings() {
        let src = "(defn a []\r\n  1";
        assert_eq!(fix(src).as_deref(), Some("(defn a []\r\n  1)"));
    }
}
