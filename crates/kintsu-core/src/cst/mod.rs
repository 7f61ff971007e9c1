//! Concrete Syntax Tree (CST) for s-expression source
//!
//! A lossless syntax tree built on the Rowan library. The CST preserves all
//! source information including whitespace and comments, which enables:
//! - Exact source round-tripping: `parse_source(src).0.text() == src`
//! - Structural edits that leave untouched bytes byte-for-byte identical
//! - Delimiter diagnostics with precise spans
//!
//! Rowan's green/red tree split gives us persistent trees: an edit builds a
//! new green tree sharing unchanged subtrees with the old one, so holders of
//! a previous revision are unaffected.

mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub use language::SexpLanguage;
pub use lexer::{LexError, LexResult, SexpToken, Span, lex};
pub use nodes::{
    NodeOrToken, SexpSyntaxElement, SexpSyntaxNode, SexpSyntaxNodeExt, SexpSyntaxToken, TextRange,
    TextSize, WalkEvent,
};
pub use parser::{ParseError, ParseErrorKind, ParsedForm, parse_one, parse_source};
pub use syntax_kind::SexpSyntaxKind;
