//! Fitch Lexer
//!
//! Tokenizes the compact Fitch proof notation into a stream of tokens.
//! Handles the off-side rule for sub-proofs, the ASCII connectives,
//! line and block comments, and line breaks.
//!
//! # Example
//!
//! ```
//! use fitch_lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::tokenize("pred P").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Pred);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("`{ch}` is not a valid character at {line}:{column}")]
    UnexpectedCharacter {
        ch: char,
        line: usize,
        column: usize,
    },

    #[error("Incomplete `<->` at {line}:{column}")]
    IncompleteBiconditional { line: usize, column: usize },

    #[error("Unterminated block comment starting at {line}:{column}")]
    UnterminatedComment { line: usize, column: usize },

    #[error("Indent mismatch at {line}:{column}: {width} spaces does not match any outer level")]
    IndentMismatch {
        width: usize,
        line: usize,
        column: usize,
    },

    #[error("Tabs are not allowed for indentation at {line}:{column}, use spaces")]
    TabIndentation { line: usize, column: usize },
}

impl LexerError {
    pub fn line(&self) -> usize {
        match self {
            LexerError::UnexpectedCharacter { line, .. }
            | LexerError::IncompleteBiconditional { line, .. }
            | LexerError::UnterminatedComment { line, .. }
            | LexerError::IndentMismatch { line, .. }
            | LexerError::TabIndentation { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            LexerError::UnexpectedCharacter { column, .. }
            | LexerError::IncompleteBiconditional { column, .. }
            | LexerError::UnterminatedComment { column, .. }
            | LexerError::IndentMismatch { column, .. }
            | LexerError::TabIndentation { column, .. } => *column,
        }
    }
}
