use std::fmt;

use serde::Serialize;

/// Token classification for Fitch proof source.
///
/// Kinds are plain tags; the lexeme itself lives in [`Token::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Structure
    Indent,
    Undent,
    Break,

    // Words
    Identifier,
    Number,

    // Keywords
    Const,
    Pred,
    Func,

    // Connectives
    Biconditional, // <->
    Conditional,   // ->
    Conjunction,   // &
    Disjunction,   // |
    Negation,      // !
    Identity,      // =
    Forall,        // @
    Exists,        // %
    Contradiction, // $

    // Rule markers
    Proof,        // ---
    Elimination,  // - (also a reference range)
    Introduction, // +
    Reiteration,  // ^

    // Punctuation
    Comma,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,

    // End of input
    Eof,
}

impl TokenKind {
    /// Canonical spelling of punctuation kinds, `None` for words and structure.
    pub fn symbol(self) -> Option<&'static str> {
        let s = match self {
            TokenKind::Biconditional => "<->",
            TokenKind::Conditional => "->",
            TokenKind::Conjunction => "&",
            TokenKind::Disjunction => "|",
            TokenKind::Negation => "!",
            TokenKind::Identity => "=",
            TokenKind::Forall => "@",
            TokenKind::Exists => "%",
            TokenKind::Contradiction => "$",
            TokenKind::Proof => "---",
            TokenKind::Elimination => "-",
            TokenKind::Introduction => "+",
            TokenKind::Reiteration => "^",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            _ => return None,
        };
        Some(s)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Indent => "indent",
            TokenKind::Undent => "undent",
            TokenKind::Break => "line break",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Const => "`const`",
            TokenKind::Pred => "`pred`",
            TokenKind::Func => "`func`",
            TokenKind::Eof => "end of input",
            punct => return write!(f, "`{}`", punct.symbol().unwrap_or_default()),
        };
        f.write_str(name)
    }
}

/// A token produced by the Fitch lexer.
///
/// `row` and `col` are 1-based and point at the first character of the lexeme.
/// Indent and undent tokens point at the newline that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub row: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            row,
            col,
        }
    }

    /// Sentinel returned when reading past the last token.
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "", 0, 0)
    }
}

/// Map an identifier run to its keyword kind, if it is one.
pub fn keyword(word: &str) -> Option<TokenKind> {
    match word {
        "const" => Some(TokenKind::Const),
        "pred" => Some(TokenKind::Pred),
        "func" => Some(TokenKind::Func),
        _ => None,
    }
}

/// Placeholder text carried by indentation tokens.
pub const INDENT_TEXT: &str = "<indent>";
pub const UNDENT_TEXT: &str = "<undent>";
