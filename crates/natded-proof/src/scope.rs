//! Subproof/scope stack
//!
//! Tracks the open subproofs of a proof. The stack depth is the active
//! scope level; each open subproof owns one block of lines.

use crate::line::{as_text, BlockId, LineId};
use natded_formula::Formula;
use natded_rules::SubproofKind;
use serde::Serialize;

/// An open subproof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubGoal {
    pub kind: SubproofKind,
    /// Depth after the push
    pub scope_level: usize,
    #[serde(serialize_with = "as_text::optional")]
    pub assumption: Option<Formula>,
    /// What the block must establish (box-stripped for Strict)
    #[serde(serialize_with = "as_text::formula")]
    pub goal: Formula,
    /// Line the parent block receives on discharge
    #[serde(serialize_with = "as_text::formula")]
    pub conclusion: Formula,
    pub is_strict: bool,
    pub block: BlockId,
    pub show_line: LineId,
    pub assumption_line: Option<LineId>,
    pub witness: Option<String>,
}

/// Stack of open subproofs.
#[derive(Clone, Debug, Default)]
pub struct ScopeStack {
    open: Vec<SubGoal>,
    next_block: u32,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            open: Vec::new(),
            next_block: 1,
        }
    }

    /// Reserve an identity for the next block.
    pub fn allocate_block(&mut self) -> BlockId {
        let block = BlockId(self.next_block.max(1));
        self.next_block = block.0 + 1;
        block
    }

    pub fn push(&mut self, goal: SubGoal) {
        debug_assert_eq!(goal.scope_level, self.open.len() + 1);
        self.open.push(goal);
    }

    pub fn pop(&mut self) -> Option<SubGoal> {
        self.open.pop()
    }

    pub fn top(&self) -> Option<&SubGoal> {
        self.open.last()
    }

    /// Active scope level.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn active_block(&self) -> BlockId {
        self.top().map_or(BlockId::ROOT, |g| g.block)
    }

    /// Whether the active subproof is strict.
    pub fn in_strict(&self) -> bool {
        self.top().is_some_and(|g| g.is_strict)
    }

    pub fn open(&self) -> &[SubGoal] {
        &self.open
    }

    /// Blocks on the open ancestor chain, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = BlockId> + '_ {
        std::iter::once(BlockId::ROOT).chain(self.open.iter().map(|g| g.block))
    }

    pub fn is_open(&self, block: BlockId) -> bool {
        self.chain().any(|b| b == block)
    }

    /// Blocks whose lines may be cited without importation: the open chain
    /// from the innermost strict subproof inwards, or the whole chain when
    /// no strict subproof is open.
    pub fn citable(&self) -> impl Iterator<Item = BlockId> + '_ {
        let start = self
            .open
            .iter()
            .rposition(|g| g.is_strict)
            .map_or(0, |i| i + 1);
        self.chain().skip(start)
    }

    pub fn is_citable(&self, block: BlockId) -> bool {
        self.citable().any(|b| b == block)
    }

    /// Assumptions of every open subproof.
    pub fn open_assumptions(&self) -> impl Iterator<Item = &Formula> {
        self.open.iter().filter_map(|g| g.assumption.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natded_formula::parse;

    fn subgoal(stack: &mut ScopeStack, kind: SubproofKind) -> SubGoal {
        let goal = parse("Q").unwrap();
        SubGoal {
            kind,
            scope_level: stack.depth() + 1,
            assumption: (!kind.is_strict()).then(|| parse("P").unwrap()),
            goal: goal.clone(),
            conclusion: goal,
            is_strict: kind.is_strict(),
            block: stack.allocate_block(),
            show_line: LineId(0),
            assumption_line: None,
            witness: None,
        }
    }

    #[test]
    fn test_push_pop_depth() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.active_block(), BlockId::ROOT);

        let cp = subgoal(&mut stack, SubproofKind::CP);
        stack.push(cp);
        assert_eq!(stack.depth(), 1);
        let raa = subgoal(&mut stack, SubproofKind::RAA);
        stack.push(raa);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.active_block(), BlockId(2));

        assert_eq!(stack.pop().unwrap().kind, SubproofKind::RAA);
        assert_eq!(stack.depth(), 1);
        assert!(!stack.is_open(BlockId(2)));
        assert!(stack.is_open(BlockId(1)));
    }

    #[test]
    fn test_blocks_are_never_reused() {
        let mut stack = ScopeStack::new();
        let first = subgoal(&mut stack, SubproofKind::CP);
        stack.push(first);
        stack.pop();
        let second = subgoal(&mut stack, SubproofKind::CP);
        assert_eq!(second.block, BlockId(2));
    }

    #[test]
    fn test_strict_boundary() {
        let mut stack = ScopeStack::new();
        let cp = subgoal(&mut stack, SubproofKind::CP);
        stack.push(cp);
        let strict = subgoal(&mut stack, SubproofKind::Strict);
        stack.push(strict);
        assert!(stack.in_strict());
        assert!(!stack.is_citable(BlockId::ROOT));
        assert!(!stack.is_citable(BlockId(1)));
        assert!(stack.is_citable(BlockId(2)));

        let inner = subgoal(&mut stack, SubproofKind::CP);
        stack.push(inner);
        assert!(!stack.in_strict());
        assert!(stack.is_citable(BlockId(2)));
        assert!(stack.is_citable(BlockId(3)));
        assert!(!stack.is_citable(BlockId(1)));
    }

    #[test]
    fn test_open_assumptions() {
        let mut stack = ScopeStack::new();
        let cp = subgoal(&mut stack, SubproofKind::CP);
        stack.push(cp);
        let strict = subgoal(&mut stack, SubproofKind::Strict);
        stack.push(strict);
        assert_eq!(stack.open_assumptions().count(), 1);
    }
}
