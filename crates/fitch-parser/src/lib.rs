//! Fitch Parser
//!
//! Parses a token stream from `fitch-lexer` into a syntax tree:
//! declarations, premises, derivation steps and nested sub-proofs,
//! with formula precedence (quantifiers over implication over
//! conjunction/disjunction). No proof checking happens here.

pub mod ast;
pub mod parser;

pub use ast::{Node, NodeKind};
pub use parser::Parser;

use fitch_lexer::{LexerError, Token, TokenKind};

/// Parse an already tokenized proof.
pub fn parse(tokens: Vec<Token>) -> Result<Node, ParseError> {
    Parser::new(tokens).parse_fitch()
}

/// Parser error with position information. The first error aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexerError),

    #[error(
        "Parse error at line {line}, column {column}: expected {expected}, found {found} `{text}` \
         (token {position}/{total}, previous `{previous}`)"
    )]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        text: String,
        position: usize,
        total: usize,
        previous: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.line(),
            ParseError::UnexpectedToken { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.column(),
            ParseError::UnexpectedToken { column, .. } => *column,
        }
    }
}
