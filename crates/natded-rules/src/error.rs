//! Error types for rule application

use crate::input::InputRequest;
use thiserror::Error;

/// Result type for rule application
pub type RuleResult<T> = Result<T, RuleError>;

/// Reasons a rule refuses its premises.
///
/// Every variant leaves the caller's state untouched; the message is meant
/// to be shown to the learner as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Wrong number of premises
    #[error("{rule} needs {expected} premise(s), but {found} were given")]
    Arity {
        rule: &'static str,
        expected: usize,
        found: usize,
    },

    /// A premise came from a place the slot does not accept
    #[error("{rule}: the {placeholder} must come from {allowed}")]
    Source {
        rule: &'static str,
        placeholder: &'static str,
        allowed: String,
    },

    /// A premise does not have the shape the slot expects
    #[error("{rule}: the {placeholder} must be {expected}, but {found} is not")]
    Pattern {
        rule: &'static str,
        placeholder: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Premises have the right shapes but do not fit together
    #[error("{rule}: {message}")]
    Mismatch { rule: &'static str, message: String },

    /// A subproof rule was given a goal of the wrong form
    #[error("{rule} requires a goal of the form {expected}, but {found} is not")]
    Shape {
        rule: &'static str,
        expected: &'static str,
        found: String,
    },

    /// The rule cannot finish without a decision from the caller
    #[error("{} needs more input: {}", .0.rule.name(), .0.prompt)]
    InputRequired(InputRequest),

    /// The supplied decision does not fit the rule
    #[error("{rule}: {message}")]
    BadInput { rule: &'static str, message: String },
}

impl RuleError {
    pub fn mismatch(rule: &'static str, message: impl Into<String>) -> Self {
        RuleError::Mismatch {
            rule,
            message: message.into(),
        }
    }

    pub fn bad_input(rule: &'static str, message: impl Into<String>) -> Self {
        RuleError::BadInput {
            rule,
            message: message.into(),
        }
    }

    /// Whether this error only asks for more input.
    pub fn is_input_request(&self) -> bool {
        matches!(self, RuleError::InputRequired(_))
    }
}
