//! Structural edits over the lossless tree
//!
//! Edits operate on the green tree: the target's parent gets a new child
//! list and everything above is rebuilt by structure sharing, so all bytes
//! outside the edited span are byte-for-byte unchanged and holders of the
//! previous revision keep a valid tree.
//!
//! Inserts place a blank-line separator between the new content and the
//! adjacent existing sibling, keeping top-level forms visually separate;
//! the returned focus always points at the inserted fragment, not the
//! separator, so chained edits compose.

use rowan::{GreenNode, GreenToken, Language, NodeOrToken};

use crate::cst::{
    SexpLanguage, SexpSyntaxKind, SexpSyntaxNode, SexpSyntaxNodeExt, TextRange, TextSize,
    parse_source,
};
use crate::error::KintsuError;
use crate::pattern::{Pattern, find_first};
use crate::result::Result;

/// The supported edit operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Replace the target with the new content
    Replace,
    /// Insert the new content before the target
    InsertBefore,
    /// Insert the new content after the target
    InsertAfter,
}

/// Result of a structural edit
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// Root of the new tree revision
    pub root: SexpSyntaxNode,
    /// The edited or inserted fragment within the new tree
    pub focus: SexpSyntaxNode,
}

type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Apply an edit at a located subtree
///
/// The replacement text must parse cleanly into one or more forms.
pub fn apply_edit(
    target: &SexpSyntaxNode,
    op: EditOp,
    replacement: &str,
) -> Result<EditOutcome> {
    let fragments = parse_fragments(replacement)?;
    let parent = target.parent().ok_or_else(|| {
        KintsuError::edit_error("cannot edit the document root")
    })?;

    let parent_green = parent.green();
    let children: Vec<GreenElement> = parent_green
        .children()
        .map(|child| match child {
            NodeOrToken::Node(n) => NodeOrToken::Node(n.to_owned()),
            NodeOrToken::Token(t) => NodeOrToken::Token(t.to_owned()),
        })
        .collect();

    let idx = target.index();
    let mut new_children = Vec::with_capacity(children.len() + fragments.len() + 1);
    new_children.extend(children[..idx].iter().cloned());

    // Offset of the focus fragment within the new parent.
    let mut focus_offset: usize = new_children.iter().map(element_width).sum();
    let focus_len = usize::from(fragments[0].text_len());

    match op {
        EditOp::Replace => {
            push_fragments(&mut new_children, &fragments);
            new_children.extend(children[idx + 1..].iter().cloned());
        }
        EditOp::InsertBefore => {
            push_fragments(&mut new_children, &fragments);
            new_children.push(separator());
            new_children.extend(children[idx..].iter().cloned());
        }
        EditOp::InsertAfter => {
            new_children.push(children[idx].clone());
            new_children.push(separator());
            focus_offset += element_width(&children[idx]) + 2;
            push_fragments(&mut new_children, &fragments);
            new_children.extend(children[idx + 1..].iter().cloned());
        }
    }

    let new_parent = GreenNode::new(SexpLanguage::kind_to_raw(parent.kind()), new_children);
    let new_root = SexpSyntaxNode::new_root(parent.replace_with(new_parent));

    let start = usize::from(parent.text_range().start()) + focus_offset;
    let focus = node_at(&new_root, start, focus_len)?;

    Ok(EditOutcome {
        root: new_root,
        focus,
    })
}

/// Locate a target by pattern and apply an edit there
///
/// A pattern with no match is a structured error; nothing is modified.
pub fn edit_matching(
    root: &SexpSyntaxNode,
    pattern_text: &str,
    op: EditOp,
    replacement: &str,
) -> Result<EditOutcome> {
    let pattern = Pattern::compile(pattern_text)?;
    let target =
        find_first(root, &pattern).ok_or_else(|| KintsuError::no_match(pattern_text))?;
    apply_edit(&target, op, replacement)
}

/// Parse replacement text into top-level form green nodes
fn parse_fragments(replacement: &str) -> Result<Vec<GreenNode>> {
    let (tree, errors) = parse_source(replacement);
    if let Some(err) = errors.first() {
        return Err(KintsuError::edit_error(format!(
            "replacement does not parse: {}",
            err.message
        )));
    }
    let fragments: Vec<GreenNode> = tree.form_children().iter().map(|f| f.green()).collect();
    if fragments.is_empty() {
        return Err(KintsuError::edit_error("replacement contains no forms"));
    }
    Ok(fragments)
}

/// Append fragments, space-separated when there are several
fn push_fragments(children: &mut Vec<GreenElement>, fragments: &[GreenNode]) {
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            children.push(NodeOrToken::Token(GreenToken::new(
                SexpSyntaxKind::Whitespace.into(),
                " ",
            )));
        }
        children.push(NodeOrToken::Node(fragment.clone()));
    }
}

/// Blank-line separator between an inserted fragment and its neighbor
fn separator() -> GreenElement {
    NodeOrToken::Token(GreenToken::new(SexpSyntaxKind::Whitespace.into(), "\n\n"))
}

fn element_width(element: &GreenElement) -> usize {
    match element {
        NodeOrToken::Node(n) => usize::from(n.text_len()),
        NodeOrToken::Token(t) => t.text().len(),
    }
}

/// The form node spanning exactly [start, start + len) in the new tree
fn node_at(root: &SexpSyntaxNode, start: usize, len: usize) -> Result<SexpSyntaxNode> {
    let range = TextRange::new(
        TextSize::from(start as u32),
        TextSize::from((start + len) as u32),
    );
    let node = match root.covering_element(range) {
        NodeOrToken::Node(n) => SexpSyntaxNode::from(n),
        NodeOrToken::Token(t) => match t.parent() {
            Some(parent) => SexpSyntaxNode::from(parent),
            None => {
                return Err(KintsuError::internal_error(
                    "edited fragment has no parent node",
                ));
            }
        },
    };
    Ok(node)
}
