//! Type aliases and navigation helpers for s-expression CST nodes
//!
//! Built on top of Rowan's generic tree types, parameterized with
//! `SexpLanguage`. Nodes are cheap to clone and immutable; edits produce new
//! trees (see the `edit` module), so references to earlier revisions stay
//! valid.

use super::{SexpLanguage, SexpSyntaxKind};

/// A node in the s-expression concrete syntax tree
///
/// Provides parent/child/sibling navigation, pre-order traversal, and
/// lossless text reconstruction: `node.text().to_string()` is the exact
/// source of the subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SexpSyntaxNode(rowan::SyntaxNode<SexpLanguage>);

impl SexpSyntaxNode {
    pub fn new_root(green: rowan::GreenNode) -> Self {
        Self(rowan::SyntaxNode::new_root(green))
    }

    pub fn parent(&self) -> Option<SexpSyntaxNode> {
        self.0.parent().map(SexpSyntaxNode::from)
    }

    pub fn children(&self) -> impl Iterator<Item = SexpSyntaxNode> + '_ {
        self.0.children().map(SexpSyntaxNode::from)
    }

    pub fn first_child(&self) -> Option<SexpSyntaxNode> {
        self.0.first_child().map(SexpSyntaxNode::from)
    }

    pub fn next_sibling(&self) -> Option<SexpSyntaxNode> {
        self.0.next_sibling().map(SexpSyntaxNode::from)
    }

    pub fn prev_sibling(&self) -> Option<SexpSyntaxNode> {
        self.0.prev_sibling().map(SexpSyntaxNode::from)
    }

    pub fn descendants(&self) -> impl Iterator<Item = SexpSyntaxNode> + '_ {
        self.0.descendants().map(SexpSyntaxNode::from)
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SexpSyntaxNode> + '_ {
        self.0.ancestors().map(SexpSyntaxNode::from)
    }

    pub fn kind(&self) -> SexpSyntaxKind {
        self.0.kind()
    }

    pub fn text_range(&self) -> TextRange {
        self.0.text_range()
    }

    pub fn text(&self) -> rowan::SyntaxText {
        self.0.text()
    }

    pub fn children_with_tokens(&self) -> rowan::SyntaxElementChildren<SexpLanguage> {
        self.0.children_with_tokens()
    }

    pub fn covering_element(&self, range: TextRange) -> SexpSyntaxElement {
        self.0.covering_element(range)
    }

    /// Index of this node among its parent's children and tokens
    pub fn index(&self) -> usize {
        self.0.index()
    }

    /// Replace this node's green subtree, returning the new root green node
    pub fn replace_with(&self, replacement: rowan::GreenNode) -> rowan::GreenNode {
        self.0.replace_with(replacement)
    }

    /// Owned green node for this subtree
    pub fn green(&self) -> rowan::GreenNode {
        self.0.green().into_owned()
    }

    pub fn preorder(&self) -> impl Iterator<Item = WalkEvent<SexpSyntaxNode>> + '_ {
        self.0
            .preorder()
            .map(|event| event.map(SexpSyntaxNode::from))
    }
}

impl From<rowan::SyntaxNode<SexpLanguage>> for SexpSyntaxNode {
    fn from(node: rowan::SyntaxNode<SexpLanguage>) -> Self {
        Self(node)
    }
}

impl AsRef<rowan::SyntaxNode<SexpLanguage>> for SexpSyntaxNode {
    fn as_ref(&self) -> &rowan::SyntaxNode<SexpLanguage> {
        &self.0
    }
}

/// A token in the s-expression CST (leaf carrying source text)
pub type SexpSyntaxToken = rowan::SyntaxToken<SexpLanguage>;

/// Either a node or a token
pub type SexpSyntaxElement = rowan::SyntaxElement<SexpLanguage>;

pub use rowan::{NodeOrToken, TextRange, TextSize, WalkEvent};

/// Navigation helpers that skip trivia
pub trait SexpSyntaxNodeExt {
    /// Child form nodes (lists, vectors, maps, atoms, quoted forms),
    /// ignoring trivia and delimiter tokens
    fn form_children(&self) -> Vec<SexpSyntaxNode>;

    /// The first child form node
    fn first_form(&self) -> Option<SexpSyntaxNode>;

    /// If this is an atom node, the text of its value token
    fn atom_text(&self) -> Option<String>;

    /// If this is an atom node, the kind of its value token
    fn atom_token_kind(&self) -> Option<SexpSyntaxKind>;

    /// Source text with surrounding trivia trimmed
    fn trimmed_text(&self) -> String;
}

impl SexpSyntaxNodeExt for SexpSyntaxNode {
    fn form_children(&self) -> Vec<SexpSyntaxNode> {
        self.children().filter(|c| c.kind().is_form()).collect()
    }

    fn first_form(&self) -> Option<SexpSyntaxNode> {
        self.children().find(|c| c.kind().is_form())
    }

    fn atom_text(&self) -> Option<String> {
        if self.kind() != SexpSyntaxKind::Atom {
            return None;
        }
        self.children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_atom_token())
            .map(|t| t.text().to_string())
    }

    fn atom_token_kind(&self) -> Option<SexpSyntaxKind> {
        if self.kind() != SexpSyntaxKind::Atom {
            return None;
        }
        self.children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_atom_token())
            .map(|t| t.kind())
    }

    fn trimmed_text(&self) -> String {
        self.text().to_string().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::GreenNodeBuilder;

    fn build_test_tree() -> SexpSyntaxNode {
        let mut builder = GreenNodeBuilder::new();

        builder.start_node(SexpSyntaxKind::Root.into());
        builder.start_node(SexpSyntaxKind::List.into());
        builder.token(SexpSyntaxKind::LParen.into(), "(");
        builder.start_node(SexpSyntaxKind::Atom.into());
        builder.token(SexpSyntaxKind::Symbol.into(), "println");
        builder.finish_node();
        builder.token(SexpSyntaxKind::Whitespace.into(), " ");
        builder.start_node(SexpSyntaxKind::Atom.into());
        builder.token(SexpSyntaxKind::StringTok.into(), "\"hi\"");
        builder.finish_node();
        builder.token(SexpSyntaxKind::RParen.into(), ")");
        builder.finish_node();
        builder.finish_node();

        SexpSyntaxNode::new_root(builder.finish())
    }

    #[test]
    fn text_reconstruction() {
        let tree = build_test_tree();
        assert_eq!(tree.text().to_string(), "(println \"hi\")");
    }

    #[test]
    fn form_children_skip_tokens() {
        let tree = build_test_tree();
        let list = tree.first_form().unwrap();
        assert_eq!(list.kind(), SexpSyntaxKind::List);

        let forms = list.form_children();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].atom_text().as_deref(), Some("println"));
        assert_eq!(forms[1].atom_text().as_deref(), Some("\"hi\""));
    }

    #[test]
    fn atom_token_kinds() {
        let tree = build_test_tree();
        let list = tree.first_form().unwrap();
        let forms = list.form_children();
        assert_eq!(forms[0].atom_token_kind(), Some(SexpSyntaxKind::Symbol));
        assert_eq!(forms[1].atom_token_kind(), Some(SexpSyntaxKind::StringTok));
    }
}
