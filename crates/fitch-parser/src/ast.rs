//! Syntax tree for Fitch proofs.
//!
//! A single uniform [`Node`] type: every node has a kind, an optional lexeme,
//! its source position and an ordered list of owned children. Proof checkers
//! walk this tree and record their verdict in [`Node::valid`].

use std::fmt;

use fitch_lexer::Token;
use serde::Serialize;

/// What a node represents, grouped by grammar role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of the tree.
    Fitch,

    // Declarations and names
    Declaration,
    Constant,
    Predicate,
    Function,
    Variable,
    Identifier,

    // Proof structure
    Proof,
    Premises,
    Conclusions,
    Literal,
    ReferenceList,
    Reference,
    ReferenceRange,
    Number,
    Introduction,
    Elimination,
    Reiteration,

    // Connectives
    Biconditional,
    Conditional,
    Forall,
    Exists,
    Conjunction,
    Disjunction,
    Negation,
    Identity,

    /// A vacant premise or conclusion line.
    Empty,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Fitch => "fitch",
            NodeKind::Declaration => "declaration",
            NodeKind::Constant => "constant",
            NodeKind::Predicate => "predicate",
            NodeKind::Function => "function",
            NodeKind::Variable => "variable",
            NodeKind::Identifier => "identifier",
            NodeKind::Proof => "proof",
            NodeKind::Premises => "premises",
            NodeKind::Conclusions => "conclusions",
            NodeKind::Literal => "literal",
            NodeKind::ReferenceList => "reference_list",
            NodeKind::Reference => "reference",
            NodeKind::ReferenceRange => "reference_range",
            NodeKind::Number => "number",
            NodeKind::Introduction => "introduction",
            NodeKind::Elimination => "elimination",
            NodeKind::Reiteration => "reiteration",
            NodeKind::Biconditional => "biconditional",
            NodeKind::Conditional => "conditional",
            NodeKind::Forall => "forall",
            NodeKind::Exists => "exists",
            NodeKind::Conjunction => "conjunction",
            NodeKind::Disjunction => "disjunction",
            NodeKind::Negation => "negation",
            NodeKind::Identity => "identity",
            NodeKind::Empty => "empty",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A syntax tree node. Owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Originating lexeme for names, numbers and rule markers.
    pub value: Option<String>,
    pub row: usize,
    pub col: usize,
    /// Reserved for an external proof checker; the parser leaves it `false`.
    pub valid: bool,
    pub children: Vec<Node>,
}

impl Node {
    /// A structural node without a value.
    pub fn new(kind: NodeKind, row: usize, col: usize) -> Self {
        Self {
            kind,
            value: None,
            row,
            col,
            valid: false,
            children: Vec::new(),
        }
    }

    /// A node carrying the lexeme and position of `token`.
    pub fn leaf(kind: NodeKind, token: &Token) -> Self {
        Self {
            value: Some(token.text.clone()),
            ..Self::new(kind, token.row, token.col)
        }
    }

    /// An operator node built from its token and operands.
    pub fn with_children(kind: NodeKind, token: &Token, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::leaf(kind, token)
        }
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// All descendants (including `self`) of the given kind, depth-first.
    pub fn find_all(&self, kind: NodeKind) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect(kind, &mut found);
        found
    }

    fn collect<'a>(&'a self, kind: NodeKind, found: &mut Vec<&'a Node>) {
        if self.kind == kind {
            found.push(self);
        }
        for child in &self.children {
            child.collect(kind, found);
        }
    }

    /// Number of nodes in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Render the tree one node per line, indented by depth.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(self.kind.name());
        if let Some(value) = &self.value {
            out.push_str(&format!(" {value:?}"));
        }
        out.push_str(&format!(" @{}:{}\n", self.row, self.col));
        for child in &self.children {
            child.write_pretty(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitch_lexer::TokenKind;
    use pretty_assertions::assert_eq;

    fn ident(name: &str, col: usize) -> Node {
        Node::leaf(NodeKind::Identifier, &Token::new(TokenKind::Identifier, name, 1, col))
    }

    #[test]
    fn test_leaf_copies_token() {
        let node = ident("P", 4);
        assert_eq!(node.value(), Some("P"));
        assert_eq!((node.row, node.col), (1, 4));
        assert!(!node.valid);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_find_all_and_count() {
        let amp = Token::new(TokenKind::Conjunction, "&", 1, 3);
        let tree = Node::with_children(NodeKind::Conjunction, &amp, vec![ident("P", 1), ident("Q", 5)]);
        assert_eq!(tree.count(), 3);
        let names: Vec<_> = tree
            .find_all(NodeKind::Identifier)
            .into_iter()
            .filter_map(Node::value)
            .collect();
        assert_eq!(names, vec!["P", "Q"]);
    }

    #[test]
    fn test_pretty() {
        let mut root = Node::new(NodeKind::Premises, 1, 1);
        root.push(ident("P", 1));
        root.push(Node::new(NodeKind::Empty, 2, 1));
        assert_eq!(
            root.pretty(),
            "premises @1:1\n  identifier \"P\" @1:1\n  empty @2:1\n"
        );
    }

    #[test]
    fn test_pretty_nests_by_depth() {
        let amp = Token::new(TokenKind::Conjunction, "&", 1, 3);
        let conj = Node::with_children(NodeKind::Conjunction, &amp, vec![ident("P", 1)]);
        let mut root = Node::new(NodeKind::Premises, 1, 1);
        root.push(conj);
        assert_eq!(
            root.pretty(),
            "premises @1:1\n  conjunction \"&\" @1:3\n    identifier \"P\" @1:1\n"
        );
    }

    #[test]
    fn test_serializes_kind_by_name() {
        let json = serde_json::to_value(ident("P", 1)).unwrap();
        assert_eq!(json["kind"], "identifier");
        assert_eq!(json["value"], "P");
        assert_eq!(json["valid"], false);
        assert!(json["children"].as_array().unwrap().is_empty());
    }
}
