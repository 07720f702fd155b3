//! natded-rules - inference rules for natural-deduction proofs
//!
//! Rules are a closed [`RuleKind`] enum. Each rule declares its premise
//! slots in a static [`RuleInfo`]; [`RuleKind::apply`] checks the slots and
//! produces either a conclusion or a [`SubproofPlan`]. Rules that need a
//! decision from the learner (which conjunct, which term) answer with
//! [`RuleError::InputRequired`] and are re-applied with a [`RuleInput`].
//!
//! # Example
//!
//! ```
//! use natded_formula::parse;
//! use natded_rules::{Premise, RuleKind, RuleOutput};
//!
//! let premises = [
//!     Premise::line(parse("P").unwrap(), 2),
//!     Premise::line(parse("P → Q").unwrap(), 1),
//! ];
//! let out = RuleKind::MP.apply(&premises, None).unwrap();
//! assert_eq!(out, RuleOutput::Conclusion(parse("Q").unwrap()));
//! ```

pub mod apply;
pub mod error;
pub mod input;
pub mod rule;
pub mod subproof;

pub use apply::{fresh_constant, RuleOutput};
pub use error::{RuleError, RuleResult};
pub use input::{Choice, InputKind, InputRequest, RuleInput, Side};
pub use rule::{
    LogicTier, Origin, Premise, RuleInfo, RuleKind, Slot, SlotPattern, Source, UnknownRule,
};
pub use subproof::{SubproofKind, SubproofPlan};
