//! Syntax kind enumeration for the s-expression CST
//!
//! This module defines all possible node and token types in the syntax tree.
//! It covers trivia (whitespace, comments), delimiter and atom tokens, reader
//! prefixes, and the structural node kinds the parser builds.

use std::fmt;

/// Syntax kind for s-expression source elements
///
/// Token kinds occupy the low ranges, structural node kinds the 200 range.
/// The numeric values are part of the CST encoding (see `SexpLanguage`) and
/// must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SexpSyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Whitespace (spaces, tabs)
    Whitespace = 0,
    /// Line comment starting with `;` up to end of line
    CommentLine = 1,
    /// Newline (`\n`, `\r\n`, or `\r`)
    Newline = 2,

    // ==================
    // Delimiter tokens (10-19)
    // ==================
    /// `(`
    LParen = 10,
    /// `)`
    RParen = 11,
    /// `[`
    LBracket = 12,
    /// `]`
    RBracket = 13,
    /// `{`
    LBrace = 14,
    /// `}`
    RBrace = 15,

    // ==================
    // Atom tokens (20-39)
    // ==================
    /// Symbol or keyword (`foo`, `defn`, `:key`, `+`)
    Symbol = 20,
    /// Numeric literal (`42`, `-1.5`, `0x2a`)
    Number = 21,
    /// String literal, including the surrounding quotes
    StringTok = 22,
    /// Character literal (`\a`, `\newline`, `\(`)
    CharTok = 23,

    // ==================
    // Reader prefixes (40-49)
    // ==================
    /// `'`, `` ` ``, `~`, `~@`, `@`, `^`
    QuoteTok = 40,
    /// `#` dispatch prefix
    DispatchTok = 41,

    // ==================
    // Special tokens (90-99)
    // ==================
    /// Token the lexer could not classify
    ErrorTok = 90,

    // ==================
    // Structure nodes (200+)
    // ==================
    /// Whole-document root
    Root = 200,
    /// `( ... )` form
    List = 201,
    /// `[ ... ]` form
    Vector = 202,
    /// `{ ... }` or `#{ ... }` form
    Map = 203,
    /// Single atom wrapped as a node
    Atom = 204,
    /// Reader prefix applied to a form (`'x`, `#(...)`, `^meta x`)
    Quoted = 205,
    /// Error recovery node
    Error = 210,
}

impl SexpSyntaxKind {
    /// Check if this is a trivia kind (whitespace, comments, newlines)
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::CommentLine | Self::Newline)
    }

    /// Check if this is an opening delimiter token
    pub const fn is_open_delim(self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }

    /// Check if this is a closing delimiter token
    pub const fn is_close_delim(self) -> bool {
        matches!(self, Self::RParen | Self::RBracket | Self::RBrace)
    }

    /// Check if this is an atom token
    pub const fn is_atom_token(self) -> bool {
        matches!(
            self,
            Self::Symbol | Self::Number | Self::StringTok | Self::CharTok
        )
    }

    /// Check if this kind is a form node (something the matcher and editor
    /// can target)
    pub const fn is_form(self) -> bool {
        matches!(
            self,
            Self::List | Self::Vector | Self::Map | Self::Atom | Self::Quoted
        )
    }

    /// The closing kind matching an opening delimiter kind
    pub const fn matching_close(self) -> Option<SexpSyntaxKind> {
        match self {
            Self::LParen => Some(Self::RParen),
            Self::LBracket => Some(Self::RBracket),
            Self::LBrace => Some(Self::RBrace),
            _ => None,
        }
    }

    /// The node kind produced by an opening delimiter kind
    pub const fn form_kind(self) -> Option<SexpSyntaxKind> {
        match self {
            Self::LParen => Some(Self::List),
            Self::LBracket => Some(Self::Vector),
            Self::LBrace => Some(Self::Map),
            _ => None,
        }
    }

    /// The delimiter character for delimiter token kinds
    pub const fn delim_char(self) -> Option<char> {
        match self {
            Self::LParen => Some('('),
            Self::RParen => Some(')'),
            Self::LBracket => Some('['),
            Self::RBracket => Some(']'),
            Self::LBrace => Some('{'),
            Self::RBrace => Some('}'),
            _ => None,
        }
    }
}

impl From<SexpSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SexpSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

impl fmt::Display for SexpSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
