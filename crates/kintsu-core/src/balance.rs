//! Delimiter balancer: single-pass, stack-driven repair
//!
//! Consumes the expression token sequence and produces a balanced rendering
//! plus a diagnostic of how many delimiters were dropped or added, or fails
//! with the unrepairable residue.
//!
//! The balancer is bracket-type-agnostic on purpose: a closing token is
//! never compared by character identity against the most recent opener. It
//! implicitly closes whatever is most recently open, and a closer seen
//! while nothing is open is dropped and counted. Closer identity is
//! intentionally not checked; only nesting depth is repaired, so a
//! mismatched closer is rewritten to the expected counterpart rather than
//! reported.

use crate::tokenize::{Token, tokenize};

/// The fixed open-to-close delimiter bijection
pub fn closing_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Check whether a character opens a delimited form
pub fn is_open_char(c: char) -> bool {
    matches!(c, '(' | '[' | '{')
}

/// Check whether a character closes a delimited form
pub fn is_close_char(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Outcome of a balancing pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Balancing succeeded. Zero counts mean no repair was necessary.
    Repaired {
        /// The balanced text
        form: String,
        /// Unmatched closing delimiters that were dropped
        closes_removed: usize,
        /// Closing delimiters synthesized at end of input
        opens_added: usize,
    },
    /// Invalid characters make this input unrepairable by counting
    Unrepairable {
        /// Closers encountered while nothing was open
        extra_closes: usize,
        /// The invalid tokens that block repair
        bad_tokens: Vec<Token>,
        /// Partial balanced output accumulated before giving up
        partial: Vec<Token>,
    },
}

impl RepairOutcome {
    /// Whether balancing succeeded (possibly as a no-op)
    pub fn is_repaired(&self) -> bool {
        matches!(self, RepairOutcome::Repaired { .. })
    }

    /// Whether any delimiter was dropped or added
    pub fn needed_repair(&self) -> bool {
        match self {
            RepairOutcome::Repaired {
                closes_removed,
                opens_added,
                ..
            } => *closes_removed > 0 || *opens_added > 0,
            RepairOutcome::Unrepairable { .. } => true,
        }
    }
}

/// Balance a token sequence
///
/// Single left-to-right pass. Open delimiters push onto a stack and land in
/// the output; a close delimiter pops the stack and emits the popped
/// opener's closing counterpart (or is dropped and counted if the stack is
/// empty); expressions pass through untouched; invalid tokens accumulate
/// and make the pass unrepairable. At end of input every still-open
/// delimiter is closed innermost-first so nesting matches the original.
pub fn balance(tokens: &[Token]) -> RepairOutcome {
    let mut accum: Vec<Token> = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut extra_closes = 0usize;
    let mut bad_tokens: Vec<Token> = Vec::new();
    let mut rewrote_closer = false;

    for token in tokens {
        match token {
            Token::Expression(_) => accum.push(token.clone()),
            Token::Delimiter(c) if is_open_char(*c) => {
                stack.push(*c);
                accum.push(token.clone());
            }
            Token::Delimiter(c) => match stack.pop() {
                Some(open) => {
                    let close = closing_for(open).unwrap_or(')');
                    if close != *c {
                        rewrote_closer = true;
                    }
                    accum.push(Token::Delimiter(close));
                }
                None => extra_closes += 1,
            },
            Token::Invalid(_) => bad_tokens.push(token.clone()),
        }
    }

    if !bad_tokens.is_empty() {
        tracing::debug!(
            bad = bad_tokens.len(),
            "delimiter repair blocked by invalid characters"
        );
        return RepairOutcome::Unrepairable {
            extra_closes,
            bad_tokens,
            partial: accum,
        };
    }

    let opens_added = stack.len();
    while let Some(open) = stack.pop() {
        accum.push(Token::Delimiter(closing_for(open).unwrap_or(')')));
    }

    if extra_closes > 0 || opens_added > 0 || rewrote_closer {
        tracing::debug!(
            closes_removed = extra_closes,
            opens_added,
            "delimiter repair applied"
        );
    }

    RepairOutcome::Repaired {
        form: render(&accum),
        closes_removed: extra_closes,
        opens_added,
    }
}

/// Repair raw text by tokenizing and balancing
///
/// When the pass neither drops, adds, nor rewrites a delimiter, the
/// original text is returned byte-for-byte (no-op on valid input), which
/// also makes repair idempotent: a second pass over repaired output
/// changes nothing.
pub fn repair(text: &str) -> RepairOutcome {
    let tokens = tokenize(text);
    match balance(&tokens) {
        RepairOutcome::Repaired {
            form,
            closes_removed: 0,
            opens_added: 0,
        } if form == render_tokens_of(text) => RepairOutcome::Repaired {
            form: text.to_string(),
            closes_removed: 0,
            opens_added: 0,
        },
        outcome => outcome,
    }
}

/// The same rendering the balancer would produce for untouched tokens;
/// used to detect that balancing was a pure no-op
fn render_tokens_of(text: &str) -> String {
    render(&tokenize(text))
}

/// Render tokens left to right with a single separating space, suppressed
/// after an opener and before a closer
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;

    for token in tokens {
        let glue = match (prev, token) {
            (None, _) => false,
            (Some(Token::Delimiter(c)), _) if is_open_char(*c) => false,
            (_, Token::Delimiter(c)) if is_close_char(*c) => false,
            _ => true,
        };
        if glue {
            out.push(' ');
        }
        out.push_str(&token.text());
        prev = Some(token);
    }

    out
}
