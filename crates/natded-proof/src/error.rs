//! Error types for the proof engine

use crate::config::LogicSystem;
use natded_formula::ParseError;
use natded_rules::RuleError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for proof operations
pub type ProofResult<T> = Result<T, ProofError>;

/// Coarse classification of a rejected command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed formula text
    Parse,
    /// Premises do not satisfy the rule
    RuleMismatch,
    /// An equal proven line already exists in the block
    Dedupe,
    /// A cited line or target scope is out of reach
    ScopeViolation,
    /// A subproof rule was given a goal of the wrong form
    SubproofShape,
    /// The command itself does not make sense in the current state
    Command,
}

/// Errors that can occur while driving a proof.
///
/// Every error leaves the proof state exactly as it was before the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Engine-side restriction on a rule (fresh names, UG conditions)
    #[error("{rule}: {message}")]
    Restriction { rule: &'static str, message: String },

    #[error("{formula} is already proven in this block (line {existing})")]
    Duplicate { formula: String, existing: u32 },

    #[error("{message}")]
    ScopeViolation { message: String },

    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    #[error("{rule} is not available in {system} logic")]
    RuleUnavailable {
        rule: &'static str,
        system: LogicSystem,
    },

    #[error("there is no line {0}")]
    UnknownLine(u32),

    #[error("there is no open subproof to discharge")]
    NoOpenSubproof,

    #[error("the {kind} subproof cannot be discharged: {goal} has not been reached")]
    GoalNotMet { kind: &'static str, goal: String },

    #[error("no rule is waiting for input")]
    NoPendingInput,

    #[error("manual lines are disabled")]
    ManualLinesDisabled,

    #[error("invalid problem: {0}")]
    Problem(String),
}

impl ProofError {
    pub fn scope(message: impl Into<String>) -> Self {
        ProofError::ScopeViolation {
            message: message.into(),
        }
    }

    pub fn restriction(rule: &'static str, message: impl Into<String>) -> Self {
        ProofError::Restriction {
            rule,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProofError::Parse(_) => ErrorKind::Parse,
            ProofError::Rule(RuleError::Shape { .. }) => ErrorKind::SubproofShape,
            ProofError::Rule(_) | ProofError::Restriction { .. } => ErrorKind::RuleMismatch,
            ProofError::Duplicate { .. } => ErrorKind::Dedupe,
            ProofError::ScopeViolation { .. } => ErrorKind::ScopeViolation,
            ProofError::UnknownRule(_)
            | ProofError::RuleUnavailable { .. }
            | ProofError::UnknownLine(_)
            | ProofError::NoOpenSubproof
            | ProofError::GoalNotMet { .. }
            | ProofError::NoPendingInput
            | ProofError::ManualLinesDisabled
            | ProofError::Problem(_) => ErrorKind::Command,
        }
    }
}
