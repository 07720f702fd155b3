//! Error types for formula parsing

use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors reported while tokenizing or parsing formula text.
///
/// Positions are character offsets into the input, not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character outside the formula alphabet
    #[error("unknown symbol '{symbol}' at position {position}")]
    UnknownSymbol { symbol: char, position: usize },

    /// An opening parenthesis without a match, or a stray closing one
    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParens { position: usize },

    /// An operator with nothing usable on one of its sides
    #[error("operator '{op}' at position {position} is missing an operand")]
    MissingOperand { op: String, position: usize },

    /// A quantifier not followed by a variable letter
    #[error("quantifier '{quantifier}' at position {position} must be followed by a variable")]
    ExpectedVariable { quantifier: char, position: usize },

    /// A well-formed token in a place where it cannot appear
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },

    /// Input contained no tokens at all
    #[error("empty formula")]
    Empty,
}

impl ParseError {
    /// Character offset of the offending token.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnknownSymbol { position, .. } => *position,
            ParseError::UnbalancedParens { position } => *position,
            ParseError::MissingOperand { position, .. } => *position,
            ParseError::ExpectedVariable { position, .. } => *position,
            ParseError::UnexpectedToken { position, .. } => *position,
            ParseError::Empty => 0,
        }
    }

    /// Human-readable message, as shown to the learner.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
