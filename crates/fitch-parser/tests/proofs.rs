use fitch_lexer::{LexerError, Scanner, TokenKind};
use fitch_parser::{parse, Node, NodeKind, ParseError, Parser};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const MODUS_PONENS: &str = "\
pred P, Q
// premises
P
P -> Q
---
--> (1, 2) Q
";

const CONDITIONAL_PROOF: &str = "\
pred P, Q, R
P -> Q
Q -> R
---
  P
  ---
  --> (1, 3) Q
  --> (2, 4) R
+-> (3-5) P -> R
";

const UNIVERSAL: &str = "\
const a
pred P, Q
@x (P(x) -> Q(x)); @x P(x)
---
  [b]
  ---
  -@ (1) P(b) -> Q(b)
  -@ (2) P(b)
  --> (4, 5) Q(b)
+@ (3:1-6) @x Q(x)
";

fn kinds_of(nodes: &[Node]) -> Vec<NodeKind> {
    nodes.iter().map(|n| n.kind).collect()
}

/// Every declaration holds one kind of name, matching its keyword.
fn assert_declarations_homogeneous(root: &Node) {
    for decl in root.find_all(NodeKind::Declaration) {
        let expected = match decl.value() {
            Some("const") => NodeKind::Constant,
            Some("pred") => NodeKind::Predicate,
            Some("func") => NodeKind::Function,
            other => panic!("unexpected declaration keyword {other:?}"),
        };
        assert!(decl.children.iter().all(|c| c.kind == expected));
    }
}

/// Every proof has exactly `premises` then `conclusions`.
fn assert_proofs_two_children(root: &Node) {
    for proof in root.find_all(NodeKind::Proof) {
        assert_eq!(
            kinds_of(&proof.children),
            vec![NodeKind::Premises, NodeKind::Conclusions]
        );
    }
}

#[test]
fn modus_ponens() {
    let root = Parser::parse(MODUS_PONENS).unwrap();
    assert_eq!(root.kind, NodeKind::Fitch);
    assert_eq!(
        kinds_of(&root.children),
        vec![NodeKind::Declaration, NodeKind::Proof]
    );

    let proof = &root.children[1];
    assert_eq!(
        kinds_of(&proof.children[0].children),
        vec![NodeKind::Identifier, NodeKind::Conditional]
    );

    let step = &proof.children[1].children[0];
    assert_eq!(step.kind, NodeKind::Elimination);
    assert_eq!(step.children[0].value(), Some("->"));
    assert_eq!(step.children[2].value(), Some("Q"));
}

#[test]
fn conditional_proof_nests_subproof() {
    let root = Parser::parse(CONDITIONAL_PROOF).unwrap();
    assert_proofs_two_children(&root);
    assert_declarations_homogeneous(&root);

    let conclusions = &root.children[1].children[1];
    assert_eq!(
        kinds_of(&conclusions.children),
        vec![NodeKind::Proof, NodeKind::Introduction]
    );

    let sub = &conclusions.children[0];
    assert_eq!(sub.children[1].children.len(), 2);

    let range = &conclusions.children[1].children[1].children[0];
    assert_eq!(range.kind, NodeKind::ReferenceRange);
    let ends: Vec<_> = range.children.iter().map(Node::value).collect();
    assert_eq!(ends, vec![Some("3"), Some("5")]);
}

#[test]
fn universal_introduction_with_scope() {
    let root = Parser::parse(UNIVERSAL).unwrap();
    assert_proofs_two_children(&root);
    assert_declarations_homogeneous(&root);

    let premises = &root.children[2].children[0];
    assert_eq!(
        kinds_of(&premises.children),
        vec![NodeKind::Forall, NodeKind::Forall]
    );

    let sub = &root.children[2].children[1].children[0];
    assert_eq!(sub.children[0].children[0].kind, NodeKind::Variable);
    assert_eq!(sub.children[0].children[0].value(), Some("b"));

    let intro = &root.children[2].children[1].children[1];
    let range = &intro.children[1].children[0];
    assert_eq!(range.children[0].value(), Some("3:1"));
    assert_eq!(range.children[1].value(), Some("6"));
}

#[test]
fn subproof_tokens_are_balanced() {
    let tokens = Scanner::tokenize(CONDITIONAL_PROOF).unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    let indent = kinds.iter().position(|k| *k == TokenKind::Indent).unwrap();
    let undent = kinds.iter().position(|k| *k == TokenKind::Undent).unwrap();
    assert!(indent < undent);
    assert_eq!(kinds[indent + 1], TokenKind::Identifier);
    assert_eq!(kinds[undent - 1], TokenKind::Break);
    assert_eq!(kinds[undent + 1], TokenKind::Introduction);
    assert_eq!(kinds.iter().filter(|k| **k == TokenKind::Indent).count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == TokenKind::Undent).count(), 1);
}

#[test]
fn parse_from_tokens_matches_parse_from_source() {
    let tokens = Scanner::tokenize(UNIVERSAL).unwrap();
    assert_eq!(parse(tokens).unwrap(), Parser::parse(UNIVERSAL).unwrap());
}

#[test]
fn malformed_biconditional_is_lexical() {
    let err = Parser::parse("P\nP <> Q\n---\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::Lex(LexerError::IncompleteBiconditional { line: 2, column: 4 })
    );
}

#[test]
fn indentation_mismatch_is_lexical() {
    let err = Parser::parse("P\n---\n    Q\n    ---\n  ^ (2) Q\n").unwrap_err();
    assert!(matches!(
        err,
        ParseError::Lex(LexerError::IndentMismatch { width: 2, .. })
    ));
}

#[test]
fn json_output_shape() {
    let root = Parser::parse("P\n---\n^ (1) P\n").unwrap();
    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["kind"], "fitch");
    assert_eq!(json["value"], serde_json::Value::Null);
    let proof = &json["children"][0];
    assert_eq!(proof["kind"], "proof");
    assert_eq!(proof["children"][0]["kind"], "premises");
    assert_eq!(proof["children"][1]["children"][0]["kind"], "reiteration");
    assert_eq!(proof["children"][1]["children"][0]["value"], "^");
}

#[test]
fn tokens_serialize_with_positions() {
    let tokens = Scanner::tokenize("pred P\n").unwrap();
    let json = serde_json::to_value(&tokens).unwrap();
    assert_eq!(json[0]["kind"], "pred");
    assert_eq!(json[1]["text"], "P");
    assert_eq!((json[1]["row"].as_u64(), json[1]["col"].as_u64()), (Some(1), Some(6)));
    assert_eq!(json[2]["kind"], "break");
}

fn formula() -> impl Strategy<Value = String> {
    let atom = prop::sample::select(vec!["P", "Q", "R(a)", "a = b", "f(a, b) = c"])
        .prop_map(str::to_string);
    atom.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|f| format!("!{f}")),
            inner.clone().prop_map(|f| format!("@x {f}")),
            inner.clone().prop_map(|f| format!("%y ({f})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) -> ({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) <-> ({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} & {b}")),
            (inner.clone(), inner).prop_map(|(a, b)| format!("{a} | {b}")),
        ]
    })
}

proptest! {
    #[test]
    fn parsing_is_idempotent(premises in prop::collection::vec(formula(), 0..4), nested in any::<bool>()) {
        let mut src = premises.join("\n");
        src.push_str("\n---\n");
        if nested {
            src.push_str("  P\n  ---\n  ^ (1) P\n");
        }
        src.push_str("^ (1) P\n");

        let first = Parser::parse(&src).unwrap();
        let second = Parser::parse(&src).unwrap();
        prop_assert_eq!(&first, &second);
        assert_proofs_two_children(&first);
        prop_assert_eq!(first.children[0].children[0].children.len(), premises.len());
    }
}
