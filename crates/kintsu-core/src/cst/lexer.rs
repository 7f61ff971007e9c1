//! Trivia-preserving lexer for s-expression source
//!
//! Every byte of the input ends up in exactly one token, including
//! whitespace and comments. This is what makes the CST lossless:
//! concatenating the token texts reproduces the input unchanged, even for
//! malformed source.

use crate::cst::SexpSyntaxKind;
use std::ops::Range;

/// Byte range in the source
pub type Span = Range<usize>;

/// A lexer error with its source span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexpToken {
    pub kind: SexpSyntaxKind,
    pub text: String,
    pub span: Span,
}

impl SexpToken {
    pub fn new(kind: SexpSyntaxKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the lexer
pub type LexResult = (Vec<SexpToken>, Vec<LexError>);

/// Characters that terminate a symbol or number token
fn is_terminator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            ',' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';' | '\'' | '`' | '~' | '@' | '^'
        )
}

/// Lex the input, preserving all trivia
///
/// Commas are whitespace, as in Clojure. Unterminated strings and a trailing
/// lone backslash produce an error token plus a `LexError`; lexing itself
/// never fails.
pub fn lex(input: &str) -> LexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;

    while i < len {
        let rest = &input[i..];
        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };
        let start = i;

        match c {
            '\n' => {
                tokens.push(SexpToken::new(SexpSyntaxKind::Newline, "\n", start..i + 1));
                i += 1;
            }
            '\r' => {
                // \r\n counts as a single newline token
                let end = if rest[1..].starts_with('\n') { i + 2 } else { i + 1 };
                tokens.push(SexpToken::new(
                    SexpSyntaxKind::Newline,
                    &input[start..end],
                    start..end,
                ));
                i = end;
            }
            c if c.is_whitespace() || c == ',' => {
                let mut end = i + c.len_utf8();
                for nc in input[end..].chars() {
                    if (nc.is_whitespace() && nc != '\n' && nc != '\r') || nc == ',' {
                        end += nc.len_utf8();
                    } else {
                        break;
                    }
                }
                tokens.push(SexpToken::new(
                    SexpSyntaxKind::Whitespace,
                    &input[start..end],
                    start..end,
                ));
                i = end;
            }
            ';' => {
                let end = i + rest.find('\n').unwrap_or(rest.len());
                tokens.push(SexpToken::new(
                    SexpSyntaxKind::CommentLine,
                    &input[start..end],
                    start..end,
                ));
                i = end;
            }
            '(' => {
                tokens.push(SexpToken::new(SexpSyntaxKind::LParen, "(", start..i + 1));
                i += 1;
            }
            ')' => {
                tokens.push(SexpToken::new(SexpSyntaxKind::RParen, ")", start..i + 1));
                i += 1;
            }
            '[' => {
                tokens.push(SexpToken::new(SexpSyntaxKind::LBracket, "[", start..i + 1));
                i += 1;
            }
            ']' => {
                tokens.push(SexpToken::new(SexpSyntaxKind::RBracket, "]", start..i + 1));
                i += 1;
            }
            '{' => {
                tokens.push(SexpToken::new(SexpSyntaxKind::LBrace, "{", start..i + 1));
                i += 1;
            }
            '}' => {
                tokens.push(SexpToken::new(SexpSyntaxKind::RBrace, "}", start..i + 1));
                i += 1;
            }
            '"' => {
                let (end, terminated) = scan_string(input, start);
                if !terminated {
                    errors.push(LexError::new("Unterminated string literal", start..end));
                }
                tokens.push(SexpToken::new(
                    SexpSyntaxKind::StringTok,
                    &input[start..end],
                    start..end,
                ));
                i = end;
            }
            '\\' => {
                let end = scan_char_literal(input, start);
                if end == start + 1 {
                    errors.push(LexError::new(
                        "Expected a character after `\\`",
                        start..end,
                    ));
                    tokens.push(SexpToken::new(
                        SexpSyntaxKind::ErrorTok,
                        "\\",
                        start..end,
                    ));
                } else {
                    tokens.push(SexpToken::new(
                        SexpSyntaxKind::CharTok,
                        &input[start..end],
                        start..end,
                    ));
                }
                i = end;
            }
            '~' => {
                // ~@ is one token
                let end = if rest[1..].starts_with('@') { i + 2 } else { i + 1 };
                tokens.push(SexpToken::new(
                    SexpSyntaxKind::QuoteTok,
                    &input[start..end],
                    start..end,
                ));
                i = end;
            }
            '\'' | '`' | '@' | '^' => {
                tokens.push(SexpToken::new(
                    SexpSyntaxKind::QuoteTok,
                    &input[start..i + 1],
                    start..i + 1,
                ));
                i += 1;
            }
            '#' => {
                tokens.push(SexpToken::new(
                    SexpSyntaxKind::DispatchTok,
                    "#",
                    start..i + 1,
                ));
                i += 1;
            }
            _ => {
                let mut end = i + c.len_utf8();
                for nc in input[end..].chars() {
                    if is_terminator(nc) || nc == '\\' {
                        break;
                    }
                    end += nc.len_utf8();
                }
                let text = &input[start..end];
                let kind = if starts_number(text) {
                    SexpSyntaxKind::Number
                } else {
                    SexpSyntaxKind::Symbol
                };
                tokens.push(SexpToken::new(kind, text, start..end));
                i = end;
            }
        }
    }

    (tokens, errors)
}

/// Scan a string literal from the opening quote, honoring `\"` and `\\`
/// escapes. Returns the end offset and whether a closing quote was found.
fn scan_string(input: &str, start: usize) -> (usize, bool) {
    let mut escaped = false;
    for (off, c) in input[start + 1..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return (start + 1 + off + 1, true),
            _ => {}
        }
    }
    (input.len(), false)
}

/// Scan a character literal: `\` plus either a named character (`\newline`)
/// or a single character (`\(`, `\a`). Returns the end offset, which equals
/// `start + 1` when the backslash is the last byte of input.
fn scan_char_literal(input: &str, start: usize) -> usize {
    let rest = &input[start + 1..];
    let first = match rest.chars().next() {
        Some(c) => c,
        None => return start + 1,
    };
    let mut end = start + 1 + first.len_utf8();
    if first.is_alphabetic() {
        for c in input[end..].chars() {
            if c.is_alphanumeric() || c == '-' {
                end += c.len_utf8();
            } else {
                break;
            }
        }
    }
    end
}

fn starts_number(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SexpSyntaxKind as K;

    fn kinds(input: &str) -> Vec<K> {
        lex(input).0.into_iter().map(|t| t.kind).collect()
    }

    fn lossless(input: &str) {
        let (tokens, _) = lex(input);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn lexes_simple_form() {
        assert_eq!(
            kinds("(+ 1 2)"),
            vec![
                K::LParen,
                K::Symbol,
                K::Whitespace,
                K::Number,
                K::Whitespace,
                K::Number,
                K::RParen
            ]
        );
    }

    #[test]
    fn preserves_all_input() {
        lossless("(defn hello [name]\n  (println name))\n");
        lossless("; comment\n{:a 1, :b 2}");
        lossless("(str \"a \\\"quoted\\\" b\")");
        lossless("'(a b) `(c ~d ~@e) #{1 2}");
        lossless("(first \\( \\newline)");
        lossless("");
    }

    #[test]
    fn comma_is_whitespace() {
        assert_eq!(
            kinds("[1,2]"),
            vec![K::LBracket, K::Number, K::Whitespace, K::Number, K::RBracket]
        );
    }

    #[test]
    fn unterminated_string_reports_error() {
        let (tokens, errors) = lex("\"abc");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, K::StringTok);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Unterminated"));
    }

    #[test]
    fn char_literals() {
        let (tokens, errors) = lex("\\a \\newline \\(");
        assert!(errors.is_empty());
        let chars: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == K::CharTok)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(chars, vec!["\\a", "\\newline", "\\("]);
    }

    #[test]
    fn negative_numbers_and_symbols() {
        assert_eq!(kinds("-42"), vec![K::Number]);
        assert_eq!(kinds("-"), vec![K::Symbol]);
        assert_eq!(kinds("my-fn"), vec![K::Symbol]);
        assert_eq!(kinds(":key"), vec![K::Symbol]);
    }

    #[test]
    fn empty_input() {
        let (tokens, errors) = lex("");
        assert!(tokens.is_empty());
        assert!(errors.is_empty());
    }
}
