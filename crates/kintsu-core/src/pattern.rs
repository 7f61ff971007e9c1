//! Structural pattern matching over parsed trees
//!
//! A pattern is itself a parsed expression in which two atoms are reserved
//! as wildcard sentinels at compile time:
//!
//! - `?` matches exactly one subtree at its position
//! - `*` matches zero or more consecutive subtrees in a sequence position
//!   (at most one `*` per sequence level)
//!
//! Because the sentinels are ordinary symbol spellings, a pattern cannot
//! match a literal `?` or `*` symbol in the candidate tree; patterns
//! targeting those spellings are intentionally unsupported.
//!
//! Matching is a pure predicate: atoms compare by token text, sequences
//! compare positionally and recursively with the same bracket kind.
//! Whole-tree search is pre-order (node before children, siblings left to
//! right), so the first match is deterministic across calls.

use crate::cst::{SexpSyntaxKind, SexpSyntaxNode, SexpSyntaxNodeExt, parse_source};
use crate::error::KintsuError;
use crate::result::Result;

/// One node of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternNode {
    /// `?` — any single subtree
    Any,
    /// `*` — zero or more subtrees (sequence positions only)
    Rest,
    /// Literal atom, compared by token text
    Atom(String),
    /// Delimited sequence with the bracket kind it was written with
    Seq {
        kind: SexpSyntaxKind,
        items: Vec<PatternNode>,
    },
    /// Reader prefix plus inner form (`'x`, `#(...)`)
    Quoted {
        prefix: String,
        inner: Box<PatternNode>,
    },
}

/// A compiled structural pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    root: PatternNode,
    source: String,
}

impl Pattern {
    /// Compile a pattern from its textual form
    ///
    /// The text must parse cleanly into exactly one form; `*` is rejected
    /// at top level and at most one `*` is allowed per sequence level.
    pub fn compile(text: &str) -> Result<Pattern> {
        let (tree, errors) = parse_source(text);
        if let Some(err) = errors.first() {
            return Err(KintsuError::pattern_error(format!(
                "pattern does not parse: {}",
                err.message
            )));
        }
        let forms = tree.form_children();
        let form = match forms.as_slice() {
            [single] => single,
            [] => return Err(KintsuError::pattern_error("pattern is empty")),
            _ => {
                return Err(KintsuError::pattern_error(
                    "pattern must be a single form",
                ));
            }
        };
        let root = compile_node(form)?;
        if root == PatternNode::Rest {
            return Err(KintsuError::pattern_error(
                "`*` is only allowed inside a sequence",
            ));
        }
        Ok(Pattern {
            root,
            source: text.to_string(),
        })
    }

    /// The textual form this pattern was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this pattern matches the given subtree
    pub fn matches(&self, node: &SexpSyntaxNode) -> bool {
        node_matches(&self.root, node)
    }
}

fn compile_node(node: &SexpSyntaxNode) -> Result<PatternNode> {
    match node.kind() {
        SexpSyntaxKind::Atom => {
            let text = node
                .atom_text()
                .unwrap_or_else(|| node.trimmed_text());
            Ok(match text.as_str() {
                "?" => PatternNode::Any,
                "*" => PatternNode::Rest,
                _ => PatternNode::Atom(text),
            })
        }
        SexpSyntaxKind::List | SexpSyntaxKind::Vector | SexpSyntaxKind::Map => {
            let mut items = Vec::new();
            let mut rest_seen = false;
            for child in node.form_children() {
                let item = compile_node(&child)?;
                if item == PatternNode::Rest {
                    if rest_seen {
                        return Err(KintsuError::pattern_error(
                            "at most one `*` per sequence level",
                        ));
                    }
                    rest_seen = true;
                }
                items.push(item);
            }
            Ok(PatternNode::Seq {
                kind: node.kind(),
                items,
            })
        }
        SexpSyntaxKind::Quoted => {
            let prefix = quoted_prefix(node);
            let inner = node.first_form().ok_or_else(|| {
                KintsuError::pattern_error("reader prefix in pattern lacks a form")
            })?;
            Ok(PatternNode::Quoted {
                prefix,
                inner: Box::new(compile_node(&inner)?),
            })
        }
        other => Err(KintsuError::pattern_error(format!(
            "unsupported pattern node: {other:?}"
        ))),
    }
}

/// The prefix token text of a quoted form (`'`, `` ` ``, `~@`, `#`, ...)
fn quoted_prefix(node: &SexpSyntaxNode) -> String {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| {
            matches!(
                t.kind(),
                SexpSyntaxKind::QuoteTok | SexpSyntaxKind::DispatchTok
            )
        })
        .map(|t| t.text().to_string())
        .unwrap_or_default()
}

fn node_matches(pattern: &PatternNode, node: &SexpSyntaxNode) -> bool {
    match pattern {
        PatternNode::Any => true,
        PatternNode::Rest => false, // only meaningful inside seq_matches
        PatternNode::Atom(text) => {
            node.kind() == SexpSyntaxKind::Atom
                && node.atom_text().as_deref() == Some(text.as_str())
        }
        PatternNode::Seq { kind, items } => {
            node.kind() == *kind && seq_matches(items, &node.form_children())
        }
        PatternNode::Quoted { prefix, inner } => {
            node.kind() == SexpSyntaxKind::Quoted
                && quoted_prefix(node) == *prefix
                && node
                    .first_form()
                    .is_some_and(|form| node_matches(inner, &form))
        }
    }
}

/// Positional sequence matching with an optional single `*`
fn seq_matches(items: &[PatternNode], candidates: &[SexpSyntaxNode]) -> bool {
    match items.iter().position(|i| *i == PatternNode::Rest) {
        None => {
            items.len() == candidates.len()
                && items
                    .iter()
                    .zip(candidates)
                    .all(|(p, c)| node_matches(p, c))
        }
        Some(split) => {
            let prefix = &items[..split];
            let suffix = &items[split + 1..];
            if prefix.len() + suffix.len() > candidates.len() {
                return false;
            }
            let tail = &candidates[candidates.len() - suffix.len()..];
            prefix
                .iter()
                .zip(candidates)
                .all(|(p, c)| node_matches(p, c))
                && suffix.iter().zip(tail).all(|(p, c)| node_matches(p, c))
        }
    }
}

/// Find the first matching subtree in pre-order, or `None`
pub fn find_first(root: &SexpSyntaxNode, pattern: &Pattern) -> Option<SexpSyntaxNode> {
    root.descendants()
        .filter(|n| n.kind().is_form())
        .find(|n| pattern.matches(n))
}

/// Find all matching subtrees in pre-order
pub fn find_all(root: &SexpSyntaxNode, pattern: &Pattern) -> Vec<SexpSyntaxNode> {
    root.descendants()
        .filter(|n| n.kind().is_form())
        .filter(|n| pattern.matches(n))
        .collect()
}
