//! Two-phase rule input.
//!
//! Some rules cannot finish from their premises alone: simplification needs
//! to know which conjunct to keep, instantiation needs a term. Such rules
//! answer with an [`InputRequest`] and the caller re-applies the rule with a
//! [`RuleInput`].

use crate::rule::RuleKind;
use natded_formula::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a binary connective to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// A caller's answer to an [`InputRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleInput {
    /// Conjunct or direction choice (Simp, BC)
    Side(Side),
    /// Instantiating term (UI)
    Term(Term),
    /// New name for an existential witness (EI, EE)
    Witness(String),
    /// Term to abstract and the variable to bind it to (UG, EG)
    Generalize { term: Term, variable: String },
}

impl fmt::Display for RuleInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleInput::Side(Side::Left) => write!(f, "left"),
            RuleInput::Side(Side::Right) => write!(f, "right"),
            RuleInput::Term(t) => write!(f, "{t}"),
            RuleInput::Witness(w) => write!(f, "{w}"),
            RuleInput::Generalize { term, variable } => write!(f, "{term} as {variable}"),
        }
    }
}

/// Kind of answer a request expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Side,
    Term,
    Witness,
    Generalize,
}

/// One suggested answer, with the text to show for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub input: RuleInput,
    pub label: String,
}

/// What a rule needs before it can produce a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    pub rule: RuleKind,
    pub kind: InputKind,
    pub prompt: String,
    /// Valid answers when the set is closed (sides), suggestions otherwise.
    pub choices: Vec<Choice>,
}

impl InputRequest {
    pub fn new(rule: RuleKind, kind: InputKind, prompt: impl Into<String>) -> Self {
        InputRequest {
            rule,
            kind,
            prompt: prompt.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choice(mut self, input: RuleInput, label: impl Into<String>) -> Self {
        self.choices.push(Choice {
            input,
            label: label.into(),
        });
        self
    }
}
