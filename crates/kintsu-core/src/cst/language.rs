//! Rowan language implementation for s-expression source
//!
//! Connects `SexpSyntaxKind` to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SexpSyntaxKind;

/// Language implementation for Lisp-family s-expression source
///
/// Zero-sized type implementing `rowan::Language`, providing the bridge
/// between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SexpLanguage;

impl Language for SexpLanguage {
    type Kind = SexpSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => SexpSyntaxKind::Whitespace,
            1 => SexpSyntaxKind::CommentLine,
            2 => SexpSyntaxKind::Newline,

            // Delimiters
            10 => SexpSyntaxKind::LParen,
            11 => SexpSyntaxKind::RParen,
            12 => SexpSyntaxKind::LBracket,
            13 => SexpSyntaxKind::RBracket,
            14 => SexpSyntaxKind::LBrace,
            15 => SexpSyntaxKind::RBrace,

            // Atoms
            20 => SexpSyntaxKind::Symbol,
            21 => SexpSyntaxKind::Number,
            22 => SexpSyntaxKind::StringTok,
            23 => SexpSyntaxKind::CharTok,

            // Reader prefixes
            40 => SexpSyntaxKind::QuoteTok,
            41 => SexpSyntaxKind::DispatchTok,

            // Special tokens
            90 => SexpSyntaxKind::ErrorTok,

            // Structure nodes
            200 => SexpSyntaxKind::Root,
            201 => SexpSyntaxKind::List,
            202 => SexpSyntaxKind::Vector,
            203 => SexpSyntaxKind::Map,
            204 => SexpSyntaxKind::Atom,
            205 => SexpSyntaxKind::Quoted,
            210 => SexpSyntaxKind::Error,

            other => {
                tracing::warn!("unknown syntax kind {other}");
                SexpSyntaxKind::ErrorTok
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        let kinds = [
            SexpSyntaxKind::Whitespace,
            SexpSyntaxKind::LParen,
            SexpSyntaxKind::Symbol,
            SexpSyntaxKind::StringTok,
            SexpSyntaxKind::Root,
            SexpSyntaxKind::List,
            SexpSyntaxKind::Atom,
        ];

        for &kind in &kinds {
            let raw = SexpLanguage::kind_to_raw(kind);
            let back = SexpLanguage::kind_from_raw(raw);
            assert_eq!(kind, back, "roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn kind_values() {
        assert_eq!(SexpLanguage::kind_to_raw(SexpSyntaxKind::Whitespace).0, 0);
        assert_eq!(SexpLanguage::kind_to_raw(SexpSyntaxKind::LParen).0, 10);
        assert_eq!(SexpLanguage::kind_to_raw(SexpSyntaxKind::Symbol).0, 20);
        assert_eq!(SexpLanguage::kind_to_raw(SexpSyntaxKind::Root).0, 200);
    }
}
