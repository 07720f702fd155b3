//! Proof lines

use natded_formula::Formula;
use serde::{Serialize, Serializer};
use std::fmt;

/// Position of a line in the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineId(pub usize);

/// Identity of a block of lines owned by one subproof instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The top-level proof.
    pub const ROOT: BlockId = BlockId(0);

    pub fn is_root(self) -> bool {
        self == BlockId::ROOT
    }
}

/// How a line came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Premise,
    /// Conclusion of a rule
    Derived,
    /// Brought into a strict subproof by □Imp
    Imported,
    Assumption,
    /// Unnumbered announcement of a subproof goal
    Show,
    /// Conclusion of a closed subproof
    Discharged,
    /// Added by hand
    Manual,
}

/// One line of the proof.
///
/// Lines are created by the ledger and never change afterwards, except for
/// the goal flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProofLine {
    pub id: LineId,
    /// `None` for Show lines
    pub number: Option<u32>,
    #[serde(skip)]
    pub formula: Formula,
    /// Canonical text of the formula
    pub text: String,
    pub justification: String,
    pub scope_level: usize,
    pub kind: LineKind,
    pub block: BlockId,
    pub satisfies_goal: bool,
}

impl ProofLine {
    pub fn is_assumption(&self) -> bool {
        self.kind == LineKind::Assumption
    }

    pub fn is_show_line(&self) -> bool {
        self.kind == LineKind::Show
    }

    pub fn is_proven(&self) -> bool {
        !matches!(self.kind, LineKind::Assumption | LineKind::Show)
    }

    /// Owning subproof block, `None` at the top level.
    pub fn parent_subproof_id(&self) -> Option<BlockId> {
        (!self.block.is_root()).then_some(self.block)
    }

    /// Display label: the line number, or `Show` for Show lines.
    pub fn label(&self) -> String {
        match self.number {
            Some(n) => n.to_string(),
            None => "Show".to_string(),
        }
    }
}

impl fmt::Display for ProofLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.scope_level);
        match self.number {
            Some(n) => write!(f, "{n:>3}. {indent}{}    {}", self.text, self.justification),
            None => write!(f, "     {indent}Show {}", self.text),
        }
    }
}

/// Serialize formulas by their canonical text.
pub(crate) mod as_text {
    use super::*;

    pub fn formula<S: Serializer>(formula: &Formula, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(formula)
    }

    pub fn optional<S: Serializer>(formula: &Option<Formula>, s: S) -> Result<S::Ok, S::Error> {
        match formula {
            Some(f) => s.collect_str(f),
            None => s.serialize_none(),
        }
    }
}
