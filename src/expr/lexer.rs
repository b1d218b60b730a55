//! Lexer (tokenizer) for SPICE and COMSOL expressions.

use super::Dialect;
use crate::error::{ParsevalError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

/// Token types in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A number, keeping the literal as written
    Number { text: String, value: f64 },
    /// A variable name or unit symbol
    Identifier(String),
    /// An arithmetic operator
    Operator(Operator),
    /// Open parenthesis '('
    LParen,
    /// Close parenthesis ')'
    RParen,
    /// Open unit bracket '[' (COMSOL only)
    LBracket,
    /// Close unit bracket ']' (COMSOL only)
    RBracket,
    /// End of input
    End,
}

/// Arithmetic operators recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    /// `**` in SPICE, `^` in COMSOL
    Power,
}

impl TokenKind {
    /// Short description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            Self::Number { text, .. } => format!("number '{}'", text),
            Self::Identifier(name) => format!("identifier '{}'", name),
            Self::Operator(op) => format!("operator {:?}", op),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::End => "end of input".to_string(),
        }
    }
}

/// Lexer for tokenizing expression input.
///
/// Tokens are produced on demand by [`Lexer::next_token`]; once the input
/// is exhausted every further call yields [`TokenKind::End`].
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    dialect: Dialect,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str, dialect: Dialect) -> Self {
        Self {
            chars: input.chars().peekable(),
            dialect,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let column = self.column;
        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::End,
                    column,
                })
            }
        };

        let kind = match ch {
            '(' => {
                self.advance();
                TokenKind::LParen
            }
            ')' => {
                self.advance();
                TokenKind::RParen
            }
            '[' | ']' if self.dialect == Dialect::Comsol => {
                self.advance();
                if ch == '[' {
                    TokenKind::LBracket
                } else {
                    TokenKind::RBracket
                }
            }
            '+' => {
                self.advance();
                TokenKind::Operator(Operator::Plus)
            }
            '-' => {
                self.advance();
                TokenKind::Operator(Operator::Minus)
            }
            '/' => {
                self.advance();
                TokenKind::Operator(Operator::Slash)
            }
            '*' => {
                self.advance();
                if self.dialect == Dialect::Spice && self.chars.peek() == Some(&'*') {
                    self.advance();
                    TokenKind::Operator(Operator::Power)
                } else {
                    TokenKind::Operator(Operator::Star)
                }
            }
            '^' if self.dialect == Dialect::Comsol => {
                self.advance();
                TokenKind::Operator(Operator::Power)
            }
            '.' | '0'..='9' => self.read_number(column)?,
            _ if ch.is_alphabetic() || ch == '_' => TokenKind::Identifier(self.read_identifier()),
            _ => {
                return Err(ParsevalError::lexer(
                    column,
                    format!("unexpected character '{}' in {} expression", ch, self.dialect),
                ));
            }
        };

        Ok(Token { kind, column })
    }

    /// Lex the whole input, including the trailing [`TokenKind::End`].
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::End;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.column += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_digits(&mut self, text: &mut String) -> usize {
        let mut count = 0;
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_number(&mut self, column: usize) -> Result<TokenKind> {
        let mut text = String::new();

        // Integer part
        let mut digits = self.read_digits(&mut text);

        // Decimal part
        if self.chars.peek() == Some(&'.') {
            text.push('.');
            self.advance();
            digits += self.read_digits(&mut text);
        }

        if digits == 0 {
            return Err(ParsevalError::lexer(column, "'.' is not a number"));
        }

        // Exponent part, only when a digit follows the marker and sign
        if matches!(self.chars.peek(), Some('e' | 'E')) {
            let mut ahead = self.chars.clone();
            ahead.next();
            let signed = matches!(ahead.peek(), Some('+' | '-'));
            if signed {
                ahead.next();
            }
            if matches!(ahead.peek(), Some(c) if c.is_ascii_digit()) {
                text.extend(self.advance());
                if signed {
                    text.extend(self.advance());
                }
                self.read_digits(&mut text);
            }
        }

        let value = text
            .parse::<f64>()
            .map_err(|_| ParsevalError::lexer(column, format!("invalid number '{}'", text)))?;
        Ok(TokenKind::Number { text, value })
    }
}
