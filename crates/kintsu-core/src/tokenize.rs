//! Expression tokenizer: maximal complete expression, else single character
//!
//! Scans raw (possibly malformed) text into a sequence of [`Token`]s. At
//! each step the tokenizer first tries to parse one complete form from the
//! remaining input; on success the whole form becomes a single
//! `Expression` token. On failure it consumes exactly one character: a
//! `Delimiter` for bracket characters, `Invalid` for anything else.
//!
//! This policy guarantees progress (at least one byte per step) and
//! guarantees that no well-formed subexpression is ever split across
//! tokens, which lets the balancer treat expressions as atomic.
//!
//! Trivia between tokens (whitespace, commas, comments) is consumed
//! silently; an `Expression` token holds the exact source slice of its
//! form with surrounding trivia dropped.

use crate::cst::parse_one;

/// A token produced by the expression tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A syntactically complete, parseable fragment
    Expression(String),
    /// A single stray bracket character: `(`, `)`, `[`, `]`, `{`, `}`
    Delimiter(char),
    /// Any other character that could not be consumed
    Invalid(char),
}

impl Token {
    /// Source text of this token
    pub fn text(&self) -> String {
        match self {
            Token::Expression(s) => s.clone(),
            Token::Delimiter(c) | Token::Invalid(c) => c.to_string(),
        }
    }
}

/// Check whether a character is one of the six bracket characters
pub fn is_delimiter_char(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '{' | '}')
}

/// Tokenize raw text into expressions, stray delimiters, and invalid
/// characters
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < input.len() {
        let rest = &input[i..];
        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };

        // Inter-token trivia carries no structure; skip it.
        if c.is_whitespace() || c == ',' {
            i += c.len_utf8();
            continue;
        }
        if c == ';' {
            i += rest.find('\n').unwrap_or(rest.len());
            continue;
        }

        match parse_one(rest) {
            Ok(form) => {
                debug_assert!(form.consumed > 0, "tokenizer must make progress");
                tokens.push(Token::Expression(form.text));
                i += form.consumed;
            }
            Err(_) if is_delimiter_char(c) => {
                tokens.push(Token::Delimiter(c));
                i += 1;
            }
            Err(_) => {
                tokens.push(Token::Invalid(c));
                i += c.len_utf8();
            }
        }
    }

    tokens
}
