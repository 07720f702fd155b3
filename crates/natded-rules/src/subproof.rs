//! Subproof plans produced by subproof-initiating rules.

use natded_formula::Formula;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four kinds of subproof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubproofKind {
    /// Conditional proof
    CP,
    /// Reductio ad absurdum
    RAA,
    /// Strict (modal) subproof
    Strict,
    /// Existential elimination
    EE,
}

impl SubproofKind {
    pub fn name(self) -> &'static str {
        match self {
            SubproofKind::CP => "CP",
            SubproofKind::RAA => "RAA",
            SubproofKind::Strict => "Strict",
            SubproofKind::EE => "EE",
        }
    }

    pub fn is_strict(self) -> bool {
        self == SubproofKind::Strict
    }
}

impl fmt::Display for SubproofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the engine needs to open a subproof.
///
/// A plan is inert: the rule that produced it has only checked the shape
/// of the dropped goal. The engine decides whether the subproof may be
/// opened in the current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubproofPlan {
    pub kind: SubproofKind,
    /// Formula announced by the Show line
    pub show: Formula,
    /// First line of the new block; `None` for Strict
    pub assumption: Option<Formula>,
    /// What the block must establish
    pub goal: Formula,
    /// Line the parent block receives on discharge
    pub conclusion: Formula,
    /// Fresh name introduced by EE
    pub witness: Option<String>,
}
