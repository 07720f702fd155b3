//! Proof line ledger
//!
//! Ordered, append-only record of proof lines. The ledger enforces the
//! dedupe rule and the strict-block restriction on hand-written lines, numbers
//! lines, and watches for the overall goal.

use crate::error::{ProofError, ProofResult};
use crate::line::{BlockId, LineId, LineKind, ProofLine};
use natded_formula::{equal, Formula};
use tracing::debug;

/// A line waiting to be appended.
#[derive(Clone, Debug)]
pub struct NewLine {
    pub formula: Formula,
    pub justification: String,
    pub scope_level: usize,
    pub block: BlockId,
    pub kind: LineKind,
    /// Whether `block` is a strict subproof
    pub strict: bool,
}

/// Outcome of a successful append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Appended {
    pub id: LineId,
    /// The line satisfied the overall goal for the first time.
    pub reached_goal: bool,
}

#[derive(Clone, Debug)]
pub struct Ledger {
    lines: Vec<ProofLine>,
    next_number: u32,
    goal: Formula,
    goal_reached: bool,
}

impl Ledger {
    pub fn new(goal: Formula) -> Self {
        Ledger {
            lines: Vec::new(),
            next_number: 1,
            goal,
            goal_reached: false,
        }
    }

    /// Append a line.
    ///
    /// # Errors
    ///
    /// [`ProofError::Duplicate`] when a proven line with an equal formula
    /// already exists in the same block, [`ProofError::ScopeViolation`] when
    /// a hand-written line targets a strict block. The ledger is unchanged on
    /// error.
    pub fn append(&mut self, line: NewLine) -> ProofResult<Appended> {
        let proven = !matches!(line.kind, LineKind::Assumption | LineKind::Show);
        if proven {
            if let Some(existing) = self.find_proven(line.block, &line.formula) {
                return Err(ProofError::Duplicate {
                    formula: line.formula.to_string(),
                    existing: existing.number.unwrap_or_default(),
                });
            }
        }
        if line.strict && line.kind == LineKind::Manual {
            return Err(ProofError::scope(
                "lines cannot be written into a strict subproof; import them with □Imp",
            ));
        }

        let number = if line.kind == LineKind::Show {
            None
        } else {
            let n = self.next_number;
            self.next_number += 1;
            Some(n)
        };
        let satisfies_goal = proven && line.scope_level == 0 && equal(&line.formula, &self.goal);
        let reached_goal = satisfies_goal && !self.goal_reached;
        self.goal_reached |= satisfies_goal;

        let id = LineId(self.lines.len());
        debug!(
            line = ?number,
            scope = line.scope_level,
            kind = ?line.kind,
            formula = %line.formula,
            "append"
        );
        self.lines.push(ProofLine {
            id,
            number,
            text: line.formula.to_string(),
            formula: line.formula,
            justification: line.justification,
            scope_level: line.scope_level,
            kind: line.kind,
            block: line.block,
            satisfies_goal,
        });
        Ok(Appended { id, reached_goal })
    }

    /// First proven line in `block` equal to `formula`.
    pub fn find_proven(&self, block: BlockId, formula: &Formula) -> Option<&ProofLine> {
        self.in_block(block)
            .find(|l| l.is_proven() && equal(&l.formula, formula))
    }

    pub fn in_block(&self, block: BlockId) -> impl Iterator<Item = &ProofLine> {
        self.lines.iter().filter(move |l| l.block == block)
    }

    /// First and last line numbers of a block.
    pub fn number_range(&self, block: BlockId) -> Option<(u32, u32)> {
        let mut numbers = self.in_block(block).filter_map(|l| l.number);
        let first = numbers.next()?;
        let last = numbers.last().unwrap_or(first);
        Some((first, last))
    }

    pub fn get(&self, id: LineId) -> Option<&ProofLine> {
        self.lines.get(id.0)
    }

    pub fn by_number(&self, number: u32) -> Option<&ProofLine> {
        self.lines.iter().find(|l| l.number == Some(number))
    }

    pub fn lines(&self) -> &[ProofLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn goal(&self) -> &Formula {
        &self.goal
    }

    pub fn is_goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// Whether `name` occurs in any line or in the goal.
    pub fn mentions(&self, name: &str) -> bool {
        self.goal.mentions(name) || self.lines.iter().any(|l| l.formula.mentions(name))
    }
}
