//! Tokenizer for formula text
//!
//! Accepts the Unicode connectives used in the exercises as well as ASCII
//! spellings that are easier to type (`->`, `<->`, `&`, `|`, `[]`, `<>`).

use crate::ast::{BinOp, ModalOp, Quantifier};
use crate::error::{ParseError, ParseResult};

/// Token kinds
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Uppercase letter with optional digits: sentence or predicate letter
    Upper(String),
    /// Lowercase letter with optional digits: a term
    Lower(String),
    Not,
    Modal(ModalOp),
    Binary(BinOp),
    Quant(Quantifier),
    LParen,
    RParen,
    Eof,
}

impl TokenKind {
    /// Source-like rendering for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Upper(s) | TokenKind::Lower(s) => s.clone(),
            TokenKind::Not => "~".to_string(),
            TokenKind::Modal(op) => op.symbol().to_string(),
            TokenKind::Binary(op) => op.symbol().to_string(),
            TokenKind::Quant(q) => q.symbol().to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }

    /// Whether a formula may begin with this token.
    pub fn starts_formula(&self) -> bool {
        matches!(
            self,
            TokenKind::Upper(_)
                | TokenKind::Not
                | TokenKind::Modal(_)
                | TokenKind::Quant(_)
                | TokenKind::LParen
        )
    }
}

/// A token with its character offset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

/// Lexer over a character buffer
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the whole input. The result always ends with [`TokenKind::Eof`].
    pub fn tokenize(input: &str) -> ParseResult<Vec<Token>> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_digits(&mut self, name: &mut String) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            name.push(c);
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos: start,
            });
        };

        // Multi-character ASCII spellings first
        let ascii = [
            ("<->", TokenKind::Binary(BinOp::Iff)),
            ("->", TokenKind::Binary(BinOp::Implies)),
            ("<>", TokenKind::Modal(ModalOp::Possibly)),
            ("[]", TokenKind::Modal(ModalOp::Necessarily)),
        ];
        for (spelling, kind) in ascii {
            if self.matches_ahead(spelling) {
                self.pos += spelling.chars().count();
                return Ok(Token { kind, pos: start });
            }
        }

        self.pos += 1;
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '~' | '¬' => TokenKind::Not,
            '∧' | '&' | '^' => TokenKind::Binary(BinOp::And),
            '∨' | '|' => TokenKind::Binary(BinOp::Or),
            '→' | '⊃' => TokenKind::Binary(BinOp::Implies),
            '↔' | '≡' => TokenKind::Binary(BinOp::Iff),
            '□' => TokenKind::Modal(ModalOp::Necessarily),
            '◊' | '◇' => TokenKind::Modal(ModalOp::Possibly),
            '∀' => TokenKind::Quant(Quantifier::Forall),
            '∃' => TokenKind::Quant(Quantifier::Exists),
            c if c.is_ascii_uppercase() => {
                let mut name = c.to_string();
                self.take_digits(&mut name);
                TokenKind::Upper(name)
            }
            c if c.is_ascii_lowercase() => {
                let mut name = c.to_string();
                self.take_digits(&mut name);
                TokenKind::Lower(name)
            }
            other => {
                return Err(ParseError::UnknownSymbol {
                    symbol: other,
                    position: start,
                })
            }
        };
        Ok(Token { kind, pos: start })
    }

    fn matches_ahead(&self, spelling: &str) -> bool {
        spelling
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }
}
