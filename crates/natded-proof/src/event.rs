//! Events returned by engine commands

use crate::line::ProofLine;
use crate::scope::SubGoal;
use natded_rules::InputRequest;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A state change or message, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProofEvent {
    LineAdded { line: ProofLine },
    Feedback { message: String, severity: Severity },
    GoalReached,
    /// The active subproof changed; `None` when back at the top level
    SubgoalChanged { subgoal: Option<SubGoal> },
    InputRequired { request: InputRequest },
}

impl ProofEvent {
    pub fn info(message: impl Into<String>) -> Self {
        ProofEvent::Feedback {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        ProofEvent::Feedback {
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ProofEvent::Feedback {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ProofEvent::Feedback {
                severity: Severity::Error,
                ..
            }
        )
    }
}

impl fmt::Display for ProofEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofEvent::LineAdded { line } => write!(f, "{line}"),
            ProofEvent::Feedback { message, severity } => {
                let tag = match severity {
                    Severity::Info => "info",
                    Severity::Warning => "warning",
                    Severity::Error => "error",
                };
                write!(f, "{tag}: {message}")
            }
            ProofEvent::GoalReached => write!(f, "goal reached"),
            ProofEvent::SubgoalChanged { subgoal: Some(g) } => {
                write!(f, "now in {} subproof (level {}), goal {}", g.kind, g.scope_level, g.goal)
            }
            ProofEvent::SubgoalChanged { subgoal: None } => write!(f, "back at the top level"),
            ProofEvent::InputRequired { request } => {
                write!(f, "{} needs input: {}", request.rule, request.prompt)?;
                for choice in &request.choices {
                    write!(f, " [{}]", choice.label)?;
                }
                Ok(())
            }
        }
    }
}
