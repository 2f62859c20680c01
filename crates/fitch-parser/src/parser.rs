//! Proof parser for Fitch notation.
//!
//! Parses a stream of tokens (from `fitch-lexer`) into a [`Node`] tree rooted
//! at [`NodeKind::Fitch`]. One method per grammar rule, predictive with a
//! single token of lookahead:
//!
//! ```text
//! fitch       := declaration* proof
//! declaration := (const | func | pred) identifier (',' identifier)*
//! proof       := ('[' identifier ']')? (premise break)* '---' break conclusions
//! conclusions := (conclusion break? | indent proof undent)*
//! conclusion  := ('+' concludable | '-' concludable | '^') references premise
//! expression  := conditional (('&' | '|') expression)?
//! conditional := quantifier (('<->' | '->') conditional)?
//! quantifier  := '!' quantifier | ('@' | '%') identifier quantifier | term
//! term        := '!' term | '(' expression ')' | factor ('=' factor)?
//! factor      := identifier ('(' factor (',' factor)* ')')?
//! ```
//!
//! Binary connectives are right-associative. End of input counts as an
//! implicit undent, closing any open sub-proofs.

use std::sync::LazyLock;

use fitch_lexer::{Token, TokenKind};
use tracing::{debug, trace};

use crate::ast::{Node, NodeKind};
use crate::ParseError;

/// Fitch proof parser.
///
/// Converts a flat token stream into a tree using recursive descent.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser for the given tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Tokenize and parse source text.
    pub fn parse(source: &str) -> Result<Node, ParseError> {
        let tokens = fitch_lexer::Scanner::tokenize(source)?;
        Parser::new(tokens).parse_fitch()
    }

    /// Parse the whole token stream: declarations, then the main proof.
    pub fn parse_fitch(&mut self) -> Result<Node, ParseError> {
        let mut root = Node::new(NodeKind::Fitch, 1, 1);

        while matches!(
            self.peek().kind,
            TokenKind::Const | TokenKind::Pred | TokenKind::Func
        ) {
            root.push(self.parse_declaration()?);
            self.expect(TokenKind::Break)?;
        }

        root.push(self.parse_proof()?);
        self.expect(TokenKind::Eof)?;

        debug!(
            tokens = self.tokens.len(),
            nodes = root.count(),
            "parsed proof"
        );
        Ok(root)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parse `pred P, Q` / `const a, b` / `func f`.
    fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        let name_kind = match self.peek().kind {
            TokenKind::Const => NodeKind::Constant,
            TokenKind::Pred => NodeKind::Predicate,
            TokenKind::Func => NodeKind::Function,
            _ => return Err(self.unexpected(TokenKind::Pred)),
        };
        let keyword = self.advance();
        trace!(keyword = %keyword.text, "declaration");

        let mut declaration = Node::leaf(NodeKind::Declaration, &keyword);
        loop {
            let name = self.expect(TokenKind::Identifier)?;
            declaration.push(Node::leaf(name_kind, &name));
            if !self.accept(TokenKind::Comma) {
                break;
            }
        }

        Ok(declaration)
    }

    // =========================================================================
    // Proof structure
    // =========================================================================

    /// Parse a proof: optional `[x]`, premises, `---`, conclusions.
    ///
    /// Always yields exactly two children, `premises` then `conclusions`.
    #[tracing::instrument(level = "trace", skip(self), fields(pos = self.pos))]
    fn parse_proof(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_position();
        let mut proof = Node::new(NodeKind::Proof, start.0, start.1);
        let mut premises = Node::new(NodeKind::Premises, start.0, start.1);

        if self.accept(TokenKind::LBracket) {
            let variable = self.expect(TokenKind::Identifier)?;
            premises.push(Node::leaf(NodeKind::Variable, &variable));
            self.expect(TokenKind::RBracket)?;
        }

        while !self.check(TokenKind::Proof) {
            premises.push(self.parse_premise()?);
            self.expect(TokenKind::Break)?;
        }
        self.expect(TokenKind::Proof)?;
        self.expect(TokenKind::Break)?;

        proof.push(premises);
        proof.push(self.parse_conclusions()?);
        Ok(proof)
    }

    /// Parse conclusion lines and nested sub-proofs until an undent or end of input.
    fn parse_conclusions(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_position();
        let mut conclusions = Node::new(NodeKind::Conclusions, start.0, start.1);

        while !(self.check(TokenKind::Undent) || self.is_at_end()) {
            if self.accept(TokenKind::Indent) {
                conclusions.push(self.parse_proof()?);
                if !self.is_at_end() {
                    self.expect(TokenKind::Undent)?;
                }
            } else {
                conclusions.push(self.parse_conclusion()?);
                self.expect_break_or_end()?;
            }
        }

        Ok(conclusions)
    }

    /// Parse a premise formula; a line that is already over yields `empty`.
    fn parse_premise(&mut self) -> Result<Node, ParseError> {
        if self.check(TokenKind::Break) || self.is_at_end() {
            let (row, col) = self.peek_position();
            return Ok(Node::new(NodeKind::Empty, row, col));
        }
        self.parse_expression()
    }

    /// Parse one derivation step:
    /// ```text
    /// +& (1, 2) P & Q
    /// -@ (3) P(a)
    /// ^ (1:2) P
    /// ```
    #[tracing::instrument(level = "trace", skip(self), fields(pos = self.pos))]
    fn parse_conclusion(&mut self) -> Result<Node, ParseError> {
        if self.check(TokenKind::Break) {
            let (row, col) = self.peek_position();
            return Ok(Node::new(NodeKind::Empty, row, col));
        }

        let mut step = if self.accept(TokenKind::Introduction) {
            let mut step = Node::leaf(NodeKind::Introduction, self.previous());
            step.push(self.parse_concludable()?);
            step
        } else if self.accept(TokenKind::Elimination) {
            let mut step = Node::leaf(NodeKind::Elimination, self.previous());
            step.push(self.parse_concludable()?);
            step
        } else {
            let marker = self.expect(TokenKind::Reiteration)?;
            Node::leaf(NodeKind::Reiteration, &marker)
        };

        step.push(self.parse_reference_list()?);
        step.push(self.parse_premise()?);
        Ok(step)
    }

    /// The connective an introduction or elimination step operates on.
    fn parse_concludable(&mut self) -> Result<Node, ParseError> {
        const CONCLUDABLE: &[TokenKind] = &[
            TokenKind::Forall,
            TokenKind::Exists,
            TokenKind::Conditional,
            TokenKind::Biconditional,
            TokenKind::Conjunction,
            TokenKind::Disjunction,
            TokenKind::Negation,
            TokenKind::Identity,
            TokenKind::Contradiction,
            TokenKind::Identifier,
        ];

        if CONCLUDABLE.contains(&self.peek().kind) {
            let literal = self.advance();
            Ok(Node::leaf(NodeKind::Literal, &literal))
        } else {
            Err(self.unexpected(TokenKind::Contradiction))
        }
    }

    /// Parse `(1, 2:3, 4-6)`.
    fn parse_reference_list(&mut self) -> Result<Node, ParseError> {
        let open = self.expect(TokenKind::LParen)?;
        let mut list = Node::new(NodeKind::ReferenceList, open.row, open.col);

        list.push(self.parse_reference()?);
        while self.accept(TokenKind::Comma) {
            list.push(self.parse_reference()?);
        }

        self.expect(TokenKind::RParen)?;
        Ok(list)
    }

    /// Parse `n`, `n:m`, or a range `a-b` of those.
    ///
    /// A reference's value is its citation text (`"3:5"`); each component is
    /// a `number` child.
    fn parse_reference(&mut self) -> Result<Node, ParseError> {
        let line = self.expect(TokenKind::Number)?;
        let mut citation = line.text.clone();
        let mut reference = Node::new(NodeKind::Reference, line.row, line.col);
        reference.push(Node::leaf(NodeKind::Number, &line));

        if self.accept(TokenKind::Colon) {
            let item = self.expect(TokenKind::Number)?;
            citation = format!("{citation}:{}", item.text);
            reference.push(Node::leaf(NodeKind::Number, &item));
        }
        reference.value = Some(citation);

        if self.check(TokenKind::Elimination) {
            let dash = self.advance();
            let end = self.parse_reference()?;
            return Ok(Node::with_children(
                NodeKind::ReferenceRange,
                &dash,
                vec![reference, end],
            ));
        }

        Ok(reference)
    }

    // =========================================================================
    // Formulas
    // =========================================================================

    /// Lowest precedence: `&` and `|`, right-associative.
    #[tracing::instrument(level = "trace", skip(self), fields(pos = self.pos))]
    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_conditional()?;

        let kind = match self.peek().kind {
            TokenKind::Conjunction => NodeKind::Conjunction,
            TokenKind::Disjunction => NodeKind::Disjunction,
            _ => return Ok(left),
        };
        let op = self.advance();
        let right = self.parse_expression()?;
        Ok(Node::with_children(kind, &op, vec![left, right]))
    }

    /// `<->` and `->`, right-associative.
    fn parse_conditional(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_quantifier()?;

        let kind = match self.peek().kind {
            TokenKind::Biconditional => NodeKind::Biconditional,
            TokenKind::Conditional => NodeKind::Conditional,
            _ => return Ok(left),
        };
        let op = self.advance();
        let right = self.parse_conditional()?;
        Ok(Node::with_children(kind, &op, vec![left, right]))
    }

    /// Negation and `@x` / `%x` quantifiers.
    fn parse_quantifier(&mut self) -> Result<Node, ParseError> {
        let kind = match self.peek().kind {
            TokenKind::Negation => {
                let op = self.advance();
                let operand = self.parse_quantifier()?;
                return Ok(Node::with_children(NodeKind::Negation, &op, vec![operand]));
            }
            TokenKind::Forall => NodeKind::Forall,
            TokenKind::Exists => NodeKind::Exists,
            _ => return self.parse_term(),
        };

        let op = self.advance();
        let variable = self.expect(TokenKind::Identifier)?;
        let body = self.parse_quantifier()?;
        Ok(Node::with_children(
            kind,
            &op,
            vec![Node::leaf(NodeKind::Variable, &variable), body],
        ))
    }

    /// Negated terms, parenthesized formulas, and `a = b`.
    fn parse_term(&mut self) -> Result<Node, ParseError> {
        if self.accept(TokenKind::Negation) {
            let op = self.previous().clone();
            let operand = self.parse_term()?;
            return Ok(Node::with_children(NodeKind::Negation, &op, vec![operand]));
        }

        if self.accept(TokenKind::LParen) {
            let inner = self.parse_expression()?;
            self.expect(TokenKind::RParen)?;
            return Ok(inner);
        }

        let left = self.parse_factor()?;
        if self.check(TokenKind::Identity) {
            let op = self.advance();
            let right = self.parse_factor()?;
            return Ok(Node::with_children(NodeKind::Identity, &op, vec![left, right]));
        }
        Ok(left)
    }

    /// A name, optionally applied to arguments: `P`, `P(a, f(b))`.
    fn parse_factor(&mut self) -> Result<Node, ParseError> {
        let name = self.expect(TokenKind::Identifier)?;
        let mut node = Node::leaf(NodeKind::Identifier, &name);

        if self.accept(TokenKind::LParen) {
            node.push(self.parse_factor()?);
            while self.accept(TokenKind::Comma) {
                node.push(self.parse_factor()?);
            }
            self.expect(TokenKind::RParen)?;
        }

        Ok(node)
    }

    // =========================================================================
    // Token navigation helpers
    // =========================================================================

    fn peek(&self) -> &Token {
        static EOF: LazyLock<Token> = LazyLock::new(Token::eof);
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    /// Consume the current token and return it.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn previous(&self) -> &Token {
        static NONE: LazyLock<Token> = LazyLock::new(Token::eof);
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&NONE)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn accept(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind))
        }
    }

    /// A line ends with a break, except the last one.
    fn expect_break_or_end(&mut self) -> Result<(), ParseError> {
        if !self.is_at_end() {
            self.expect(TokenKind::Break)?;
        }
        Ok(())
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Position of the current token; at end of input, the last token's.
    fn peek_position(&self) -> (usize, usize) {
        let token = if self.is_at_end() {
            self.tokens.last()
        } else {
            self.tokens.get(self.pos)
        };
        token.map_or((1, 1), |t| (t.row, t.col))
    }

    fn unexpected(&self, expected: TokenKind) -> ParseError {
        let found = self.peek();
        let (line, column) = self.peek_position();
        ParseError::UnexpectedToken {
            expected,
            found: found.kind,
            text: found.text.clone(),
            position: self.pos,
            total: self.tokens.len(),
            previous: self.previous().text.clone(),
            line,
            column,
        }
    }
}
