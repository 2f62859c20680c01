use tracing::{debug, trace};

use crate::token::{self, Token, TokenKind, INDENT_TEXT, UNDENT_TEXT};
use crate::LexerError;

/// Fitch source scanner.
///
/// Tokenizes proof source into a flat stream of tokens.
/// Handles indentation tracking, connective symbols, comments,
/// and line breaks.
///
/// - `Vec<char>` source for index-based navigation
/// - Stack-based indentation tracking (off-side rule)
/// - Position tracking on every token
///
/// Open indentation levels are *not* closed at end of input; the parser
/// treats end of input as an implicit undent.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    indent_stack: Vec<usize>,
    at_line_start: bool,
    /// Position of the newline that started the current line.
    line_origin: (usize, usize),
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            indent_stack: vec![0],
            at_line_start: true,
            line_origin: (1, 1),
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens()?;
        debug!(
            tokens = scanner.tokens.len(),
            open_levels = scanner.indent_stack.len() - 1,
            "tokenized source"
        );
        Ok(scanner.tokens)
    }

    /// Scan all tokens from the source.
    fn scan_tokens(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() {
            self.scan_token()?;
        }

        // A final newline still probes width 0 against the stack.
        if self.at_line_start {
            self.at_line_start = false;
            self.handle_indentation()?;
        }
        Ok(())
    }

    /// Scan the next token.
    fn scan_token(&mut self) -> Result<(), LexerError> {
        if self.at_line_start {
            self.at_line_start = false;
            return self.handle_indentation();
        }

        let ch = self.peek();

        match ch {
            // Whitespace (mid-line, skip)
            ' ' => {
                self.advance();
                Ok(())
            }

            '\n' => {
                self.end_line();
                Ok(())
            }
            '\r' if self.peek_next() == '\n' => {
                self.advance();
                Ok(())
            }

            ';' => {
                let (line, column) = (self.line, self.column);
                self.advance();
                self.emit_break(";", line, column);
                Ok(())
            }

            // Comments
            '/' if self.peek_next() == '/' => {
                self.skip_line_comment();
                Ok(())
            }
            '/' if self.peek_next() == '*' => self.skip_block_comment(),

            // Multi-character punctuation
            '<' => self.scan_biconditional(),
            '-' => {
                self.scan_dash();
                Ok(())
            }

            // Single-character punctuation
            '+' => self.single(TokenKind::Introduction),
            '^' => self.single(TokenKind::Reiteration),
            '=' => self.single(TokenKind::Identity),
            '&' => self.single(TokenKind::Conjunction),
            '|' => self.single(TokenKind::Disjunction),
            '!' => self.single(TokenKind::Negation),
            '@' => self.single(TokenKind::Forall),
            '%' => self.single(TokenKind::Exists),
            '$' => self.single(TokenKind::Contradiction),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),

            // Numbers never start with 0
            '1'..='9' => {
                self.scan_number();
                Ok(())
            }

            // Identifiers and keywords
            c if c.is_ascii_alphabetic() => {
                self.scan_identifier();
                Ok(())
            }

            _ => Err(LexerError::UnexpectedCharacter {
                ch,
                line: self.line,
                column: self.column,
            }),
        }
    }

    // --- Line structure ---

    /// The newline that ends a line: close the line with a break if it
    /// produced anything, then start measuring the next line.
    fn end_line(&mut self) {
        let (line, column) = (self.line, self.column);
        if self.line_has_content() {
            self.emit_break("\n", line, column);
        }
        self.advance();
        self.line += 1;
        self.column = 1;
        self.at_line_start = true;
        self.line_origin = (line, column);
    }

    /// Emit one break token.
    fn emit_break(&mut self, text: &str, line: usize, column: usize) {
        self.tokens
            .push(Token::new(TokenKind::Break, text, line, column));
    }

    /// A line has content once it produced a token other than structure.
    fn line_has_content(&self) -> bool {
        self.tokens.last().is_some_and(|t| {
            !matches!(
                t.kind,
                TokenKind::Break | TokenKind::Indent | TokenKind::Undent
            )
        })
    }

    // --- Indentation ---

    /// Handle indentation at the start of a line.
    /// Counts leading spaces, compares with indent stack, emits Indent/Undent.
    fn handle_indentation(&mut self) -> Result<(), LexerError> {
        let mut spaces = 0;

        while !self.is_at_end() && self.peek() == ' ' {
            self.advance();
            spaces += 1;
        }

        if !self.is_at_end() && self.peek() == '\t' {
            return Err(LexerError::TabIndentation {
                line: self.line,
                column: self.column,
            });
        }

        // Block comments opening the line are whitespace; only what follows counts.
        let mut commented = false;
        while self.peek() == '/' && self.peek_next() == '*' {
            self.skip_block_comment()?;
            while self.peek() == ' ' {
                self.advance();
            }
            commented = true;
        }

        // Comment-only lines don't affect indentation
        if self.peek() == '/' && self.peek_next() == '/' {
            return Ok(());
        }
        if commented && self.at_line_end() {
            return Ok(());
        }

        // No leading spaces: probe width 0, even for blank lines and end of input.
        if spaces == 0 {
            return self.match_indent(0);
        }

        // Space-only lines don't affect indentation
        if self.at_line_end() {
            return Ok(());
        }

        self.match_indent(spaces)
    }

    fn at_line_end(&self) -> bool {
        self.is_at_end() || self.peek() == '\n' || self.peek() == '\r'
    }

    /// Compare `width` against the top of the indent stack.
    fn match_indent(&mut self, width: usize) -> Result<(), LexerError> {
        let (line, column) = self.line_origin;
        let current = self.current_indent();

        if width > current {
            self.indent_stack.push(width);
            trace!(width, depth = self.indent_stack.len() - 1, "indent");
            self.tokens
                .push(Token::new(TokenKind::Indent, INDENT_TEXT, line, column));
        } else if width < current {
            let mut popped = 0;
            while self.current_indent() > width {
                self.indent_stack.pop();
                popped += 1;
            }

            if self.current_indent() != width {
                return Err(LexerError::IndentMismatch {
                    width,
                    line: self.line,
                    column: self.column,
                });
            }

            trace!(width, popped, "undent");
            for _ in 0..popped {
                self.tokens
                    .push(Token::new(TokenKind::Undent, UNDENT_TEXT, line, column));
            }
        }

        Ok(())
    }

    fn current_indent(&self) -> usize {
        // Width 0 sits at the bottom of the stack and is never popped.
        self.indent_stack.last().copied().unwrap_or(0)
    }

    // --- Comments ---

    /// Skip a line comment (`// ...`), leaving the newline in place.
    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    /// Skip a block comment (`/* ... */`).
    fn skip_block_comment(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;

        // Skip `/*`
        self.advance();
        self.advance();

        loop {
            if self.is_at_end() {
                return Err(LexerError::UnterminatedComment {
                    line: start_line,
                    column: start_col,
                });
            }
            match self.peek() {
                '*' if self.peek_next() == '/' => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                _ => self.advance(),
            }
        }
    }

    // --- Scanners ---

    /// Scan `<->`. Anything else after `<` is an error.
    fn scan_biconditional(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;
        self.advance(); // consume `<`

        for expected in ['-', '>'] {
            if self.peek() != expected {
                return Err(LexerError::IncompleteBiconditional {
                    line: self.line,
                    column: self.column,
                });
            }
            self.advance();
        }

        self.tokens.push(Token::new(
            TokenKind::Biconditional,
            "<->",
            start_line,
            start_col,
        ));
        Ok(())
    }

    /// Scan `-`, `->` or `---`.
    ///
    /// `--` without a third dash is a lone `-`; the second dash is scanned again.
    fn scan_dash(&mut self) {
        let start_line = self.line;
        let start_col = self.column;
        self.advance(); // consume `-`

        let kind = if self.peek() == '>' {
            self.advance();
            TokenKind::Conditional
        } else if self.peek() == '-' && self.peek_next() == '-' {
            self.advance();
            self.advance();
            TokenKind::Proof
        } else {
            TokenKind::Elimination
        };

        let text = kind.symbol().unwrap_or("-");
        self.tokens
            .push(Token::new(kind, text, start_line, start_col));
    }

    /// Scan an identifier or keyword. Identifiers are ASCII letters only.
    fn scan_identifier(&mut self) {
        let start_line = self.line;
        let start_col = self.column;

        let mut word = String::new();
        while !self.is_at_end() && self.peek().is_ascii_alphabetic() {
            word.push(self.peek());
            self.advance();
        }

        let kind = token::keyword(&word).unwrap_or(TokenKind::Identifier);
        self.tokens
            .push(Token::new(kind, word, start_line, start_col));
    }

    /// Scan a line number.
    fn scan_number(&mut self) {
        let start_line = self.line;
        let start_col = self.column;

        let mut digits = String::new();
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            digits.push(self.peek());
            self.advance();
        }

        self.tokens
            .push(Token::new(TokenKind::Number, digits, start_line, start_col));
    }

    // --- Helpers ---

    fn single(&mut self, kind: TokenKind) -> Result<(), LexerError> {
        let text = kind.symbol().unwrap_or_default();
        self.tokens
            .push(Token::new(kind, text, self.line, self.column));
        self.advance();
        Ok(())
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.pos]
        }
    }

    fn peek_next(&self) -> char {
        if self.pos + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.pos + 1]
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
            self.column += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}
