//! Recursive-descent parser building a lossless s-expression CST
//!
//! The parser never fails outright: malformed input produces a tree whose
//! text still reproduces the source byte-for-byte, plus a list of
//! `ParseError`s. Delimiter errors use a fixed diagnostic vocabulary
//! (`Unexpected EOF while reading`, `Unmatched bracket`,
//! `Expected a .. to match ..`) that the lint classifier recognizes.

use rowan::GreenNodeBuilder;

use super::lexer::{LexError, SexpToken, Span, lex};
use super::{SexpSyntaxKind, SexpSyntaxNode};

/// Category of a parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An opening delimiter was never closed
    UnclosedDelimiter,
    /// A closing delimiter with no matching opener
    UnmatchedCloser,
    /// A closing delimiter of the wrong bracket type
    MismatchedCloser,
    /// String literal running to end of input
    UnterminatedString,
    /// A reader prefix with nothing after it
    DanglingPrefix,
    /// Anything else the lexer could not classify
    InvalidToken,
}

impl ParseErrorKind {
    /// Whether this error is attributable to unbalanced delimiters
    pub fn is_delimiter(self) -> bool {
        matches!(
            self,
            Self::UnclosedDelimiter | Self::UnmatchedCloser | Self::MismatchedCloser
        )
    }
}

/// A parse error with message and source span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let kind = if err.message.contains("Unterminated string") {
            ParseErrorKind::UnterminatedString
        } else {
            ParseErrorKind::InvalidToken
        };
        ParseError::new(kind, err.message, err.span)
    }
}

/// One complete form parsed from the front of an input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedForm {
    /// Exact source text of the form, surrounding trivia dropped
    pub text: String,
    /// Bytes consumed from the input, including trailing trivia
    pub consumed: usize,
}

/// Parse a whole document into a CST
///
/// Lossless: `tree.text().to_string() == source` for any input, including
/// malformed input. Errors are collected, not thrown.
pub fn parse_source(source: &str) -> (SexpSyntaxNode, Vec<ParseError>) {
    let (tokens, lex_errors) = lex(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_document();
    let (node, mut errors) = parser.finish();
    errors.extend(lex_errors.into_iter().map(ParseError::from));
    errors.sort_by_key(|e| e.span.start);
    (node, errors)
}

/// Parse exactly one complete form from the front of the input
///
/// Succeeds only when the first form is well formed; the reported consumed
/// length includes trailing trivia so repeated calls walk the document.
pub fn parse_one(source: &str) -> Result<ParsedForm, ParseError> {
    let (tokens, lex_errors) = lex(source);
    let mut parser = Parser::new(&tokens);

    // Leading trivia is consumed but not part of the form text.
    parser.builder.start_node(SexpSyntaxKind::Root.into());
    parser.consume_trivia();

    let form_start = match parser.current() {
        Some(tok) => tok.span.start,
        None => {
            return Err(ParseError::new(
                ParseErrorKind::UnclosedDelimiter,
                "Unexpected EOF while reading: no form present",
                source.len()..source.len(),
            ));
        }
    };

    if let Some(tok) = parser.current()
        && tok.kind.is_close_delim()
    {
        let ch = tok.kind.delim_char().unwrap_or('?');
        return Err(ParseError::new(
            ParseErrorKind::UnmatchedCloser,
            format!("Unmatched bracket: unexpected `{ch}`"),
            tok.span.clone(),
        ));
    }

    parser.parse_form();
    let form_end = parser
        .tokens
        .get(parser.pos.wrapping_sub(1))
        .map(|t| t.span.end)
        .unwrap_or(form_start);
    parser.consume_trivia();
    let consumed = parser
        .tokens
        .get(parser.pos.wrapping_sub(1))
        .map(|t| t.span.end)
        .unwrap_or(form_start);

    // Lexer errors outside the consumed span do not invalidate this form.
    if let Some(err) = parser.errors.first() {
        return Err(err.clone());
    }
    if let Some(err) = lex_errors.iter().find(|e| e.span.start < form_end) {
        return Err(ParseError::from(err.clone()));
    }

    Ok(ParsedForm {
        text: source[form_start..form_end].to_string(),
        consumed,
    })
}

struct Parser<'a> {
    tokens: &'a [SexpToken],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [SexpToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(mut self) -> (SexpSyntaxNode, Vec<ParseError>) {
        // Anything left over (possible when parse_one stops early) still
        // belongs in the tree to keep it lossless.
        while !self.at_end() {
            self.add_current();
        }
        self.builder.finish_node();
        (SexpSyntaxNode::new_root(self.builder.finish()), self.errors)
    }

    fn parse_document(&mut self) {
        self.builder.start_node(SexpSyntaxKind::Root.into());

        while !self.at_end() {
            if self.at_trivia() {
                self.add_current();
                continue;
            }
            let kind = self.current_kind();
            if kind.is_close_delim() {
                let tok = &self.tokens[self.pos];
                let ch = kind.delim_char().unwrap_or('?');
                self.errors.push(ParseError::new(
                    ParseErrorKind::UnmatchedCloser,
                    format!("Unmatched bracket: unexpected `{ch}`"),
                    tok.span.clone(),
                ));
                self.builder.start_node(SexpSyntaxKind::Error.into());
                self.add_current();
                self.builder.finish_node();
            } else {
                self.parse_form();
            }
        }
    }

    /// Parse one form: delimited, quoted, or atom
    fn parse_form(&mut self) {
        match self.current_kind() {
            k if k.is_open_delim() => self.parse_delimited(),
            SexpSyntaxKind::QuoteTok | SexpSyntaxKind::DispatchTok => self.parse_quoted(),
            k if k.is_atom_token() => {
                self.builder.start_node(SexpSyntaxKind::Atom.into());
                self.add_current();
                self.builder.finish_node();
            }
            _ => {
                // ErrorTok and anything unexpected
                let tok = &self.tokens[self.pos];
                self.errors.push(ParseError::new(
                    ParseErrorKind::InvalidToken,
                    format!("Invalid token `{}`", tok.text),
                    tok.span.clone(),
                ));
                self.builder.start_node(SexpSyntaxKind::Error.into());
                self.add_current();
                self.builder.finish_node();
            }
        }
    }

    fn parse_delimited(&mut self) {
        let open = self.current_kind();
        let open_char = open.delim_char().unwrap_or('?');
        let open_span = self.tokens[self.pos].span.clone();
        let expected = open.matching_close().unwrap_or(SexpSyntaxKind::RParen);
        let expected_char = expected.delim_char().unwrap_or('?');

        self.builder
            .start_node(open.form_kind().unwrap_or(SexpSyntaxKind::List).into());
        self.add_current();

        loop {
            if self.at_end() {
                self.errors.push(ParseError::new(
                    ParseErrorKind::UnclosedDelimiter,
                    format!("Unexpected EOF while reading: unclosed `{open_char}`"),
                    open_span.clone(),
                ));
                break;
            }
            if self.at_trivia() {
                self.add_current();
                continue;
            }
            let kind = self.current_kind();
            if kind == expected {
                self.add_current();
                break;
            }
            if kind.is_close_delim() {
                // Wrong bracket type; recover by letting it close this form.
                let found = kind.delim_char().unwrap_or('?');
                let span = self.tokens[self.pos].span.clone();
                self.errors.push(ParseError::new(
                    ParseErrorKind::MismatchedCloser,
                    format!(
                        "Expected a `{expected_char}` to match `{open_char}`, found `{found}`"
                    ),
                    span,
                ));
                self.add_current();
                break;
            }
            self.parse_form();
        }

        self.builder.finish_node();
    }

    /// Reader prefix (`'`, `` ` ``, `~`, `~@`, `@`, `^`, `#`) plus the form
    /// it applies to
    fn parse_quoted(&mut self) {
        let prefix = self.tokens[self.pos].text.clone();
        let prefix_span = self.tokens[self.pos].span.clone();
        self.builder.start_node(SexpSyntaxKind::Quoted.into());
        self.add_current();

        // Chained prefixes (`~@`, `#'`, `^:private`) nest naturally: the
        // next parse_form call handles the following prefix.
        self.consume_trivia();
        if self.at_end() || self.current_kind().is_close_delim() {
            self.errors.push(ParseError::new(
                ParseErrorKind::DanglingPrefix,
                format!("Reader prefix `{prefix}` is not followed by a form"),
                prefix_span,
            ));
        } else {
            self.parse_form();
        }

        self.builder.finish_node();
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at_trivia(&self) -> bool {
        !self.at_end() && self.tokens[self.pos].kind.is_trivia()
    }

    fn current(&self) -> Option<&SexpToken> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SexpSyntaxKind {
        self.tokens[self.pos].kind
    }

    fn add_current(&mut self) {
        let tok = &self.tokens[self.pos];
        self.builder.token(tok.kind.into(), &tok.text);
        self.pos += 1;
    }

    fn consume_trivia(&mut self) {
        while self.at_trivia() {
            self.add_current();
        }
    }
}
