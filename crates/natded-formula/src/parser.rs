//! Precedence-climbing parser for formulas
//!
//! Each call to [`parse`] builds its own [`Parser`], so parsing is reentrant
//! and holds no state between calls.

use crate::ast::{Assoc, BinOp, Formula, Term};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};
use tracing::trace;

/// Parse formula text into a [`Formula`].
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown symbols, unbalanced parentheses,
/// operators without an operand, and leftover tokens.
pub fn parse(input: &str) -> ParseResult<Formula> {
    let mut parser = Parser::new(input)?;
    let formula = parser.formula()?;
    trace!(input, formula = %formula, "parsed formula");
    Ok(formula)
}

/// Parse a single term such as `a` or `x1`.
///
/// # Errors
///
/// Returns a [`ParseError`] when the input is not exactly one lowercase term.
pub fn parse_term(input: &str) -> ParseResult<Term> {
    let tokens = Lexer::tokenize(input)?;
    match tokens.as_slice() {
        [Token {
            kind: TokenKind::Lower(name),
            ..
        }, Token {
            kind: TokenKind::Eof,
            ..
        }] => Ok(Term::named(name.clone())),
        [Token {
            kind: TokenKind::Eof,
            ..
        }] => Err(ParseError::Empty),
        [first, ..] => Err(ParseError::UnexpectedToken {
            found: first.kind.describe(),
            position: first.pos,
        }),
        [] => Err(ParseError::Empty),
    }
}

/// Parser state: a token buffer and a cursor owned by one parse call.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Tokenize `input` and position the cursor at the first token.
    ///
    /// # Errors
    ///
    /// Returns the lexer's error for symbols outside the alphabet.
    pub fn new(input: &str) -> ParseResult<Self> {
        Ok(Self {
            tokens: Lexer::tokenize(input)?,
            pos: 0,
        })
    }

    // Token access

    fn current(&self) -> &Token {
        // The lexer always appends Eof, and advance never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn peek_binop(&self) -> Option<BinOp> {
        match self.current_kind() {
            TokenKind::Binary(op) => Some(*op),
            _ => None,
        }
    }

    fn unexpected(&self) -> ParseError {
        let token = self.current();
        match token.kind {
            TokenKind::RParen => ParseError::UnbalancedParens {
                position: token.pos,
            },
            TokenKind::Binary(op) => ParseError::MissingOperand {
                op: op.symbol().to_string(),
                position: token.pos,
            },
            _ => ParseError::UnexpectedToken {
                found: token.kind.describe(),
                position: token.pos,
            },
        }
    }

    /// Parse a complete formula, rejecting trailing tokens.
    pub fn formula(&mut self) -> ParseResult<Formula> {
        if matches!(self.current_kind(), TokenKind::Eof) {
            return Err(ParseError::Empty);
        }
        let formula = self.binary(0)?;
        if !matches!(self.current_kind(), TokenKind::Eof) {
            return Err(self.unexpected());
        }
        Ok(formula)
    }

    /// Fold binary operators binding at least as tightly as `min_prec`.
    ///
    /// The right operand of a left-associative operator is parsed one level
    /// tighter, so `P ∧ Q ∧ R` folds left; right-associative operators
    /// recurse at their own level, so `P → Q → R` nests to the right.
    fn binary(&mut self, min_prec: u8) -> ParseResult<Formula> {
        let mut lhs = self.unary()?;

        while let Some(op) = self.peek_binop() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let op_token = self.advance();
            self.require_operand(&op_token)?;

            let next_min = match op.assoc() {
                Assoc::Left => prec + 1,
                Assoc::Right => prec,
            };
            let rhs = self.binary(next_min)?;
            lhs = Formula::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Error out early when the token after `op_token` cannot start an operand.
    fn require_operand(&self, op_token: &Token) -> ParseResult<()> {
        if self.current_kind().starts_formula() {
            Ok(())
        } else {
            Err(ParseError::MissingOperand {
                op: op_token.kind.describe(),
                position: op_token.pos,
            })
        }
    }

    /// Prefix operators and primaries.
    fn unary(&mut self) -> ParseResult<Formula> {
        match self.current_kind().clone() {
            TokenKind::Not => {
                let op = self.advance();
                self.require_operand(&op)?;
                Ok(Formula::not(self.unary()?))
            }
            TokenKind::Modal(modal) => {
                let op = self.advance();
                self.require_operand(&op)?;
                let inner = self.unary()?;
                Ok(Formula::Modal(modal, inner.into()))
            }
            TokenKind::Quant(kind) => {
                let op = self.advance();
                let var = match self.current_kind() {
                    TokenKind::Lower(name) => name.clone(),
                    _ => {
                        return Err(ParseError::ExpectedVariable {
                            quantifier: kind.symbol().chars().next().unwrap_or('∀'),
                            position: op.pos,
                        })
                    }
                };
                self.advance();
                self.require_operand(&op)?;
                let body = self.unary()?;
                Ok(Formula::Quant(kind, var, body.into()))
            }
            TokenKind::LParen => {
                let open = self.advance();
                if matches!(self.current_kind(), TokenKind::RParen | TokenKind::Eof) {
                    return Err(ParseError::UnbalancedParens { position: open.pos });
                }
                let inner = self.binary(0)?;
                match self.current_kind() {
                    TokenKind::RParen => {
                        self.advance();
                        Ok(inner)
                    }
                    TokenKind::Eof => Err(ParseError::UnbalancedParens { position: open.pos }),
                    _ => Err(self.unexpected()),
                }
            }
            TokenKind::Upper(name) => {
                self.advance();
                let mut args = Vec::new();
                while let TokenKind::Lower(term) = self.current_kind() {
                    args.push(Term::named(term.clone()));
                    self.advance();
                }
                if args.is_empty() {
                    Ok(Formula::Atom(name))
                } else {
                    Ok(Formula::Pred(name, args))
                }
            }
            _ => Err(self.unexpected()),
        }
    }
}
