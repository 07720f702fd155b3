//! Commands accepted by [`ProofEngine::dispatch`](crate::ProofEngine::dispatch)

use natded_rules::{RuleInput, Source};
use serde::{Deserialize, Serialize};

/// A premise reference: a line number or a workspace formula.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PremiseRef {
    Line(u32),
    Formula(String),
}

impl From<u32> for PremiseRef {
    fn from(n: u32) -> Self {
        PremiseRef::Line(n)
    }
}

impl From<&str> for PremiseRef {
    fn from(text: &str) -> Self {
        PremiseRef::Formula(text.to_string())
    }
}

fn goal_source() -> Source {
    Source::Goal
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Parse text and report its canonical form
    Parse { text: String },
    /// Open a subproof on a dropped goal
    StartSubproof {
        rule: String,
        formula: String,
        #[serde(default = "goal_source")]
        source: Source,
        /// Proof-line premises that come before the goal slot (EE)
        #[serde(default)]
        premises: Vec<PremiseRef>,
        #[serde(default)]
        input: Option<RuleInput>,
    },
    ApplyRule {
        rule: String,
        #[serde(default)]
        premises: Vec<PremiseRef>,
        #[serde(default)]
        input: Option<RuleInput>,
    },
    /// Answer the pending input request
    ProvideInput { input: RuleInput },
    Discharge,
    AddLine {
        text: String,
        #[serde(default)]
        justification: Option<String>,
        #[serde(default)]
        scope: Option<usize>,
    },
}
