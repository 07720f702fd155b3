//! natded-proof - interactive natural-deduction proofs
//!
//! A [`ProofEngine`] holds one proof: an append-only [`Ledger`] of lines, a
//! [`ScopeStack`] of open subproofs, and the goal. Commands either commit
//! and return [`ProofEvent`]s in the order things happened, or fail with a
//! [`ProofError`] and change nothing.
//!
//! # Example
//!
//! ```
//! use natded_proof::{LogicSystem, Problem, ProofEngine, ProofEvent};
//!
//! let problem = Problem::new(LogicSystem::Propositional, &["P → Q", "P"], "Q");
//! let mut engine = ProofEngine::from_problem(&problem).unwrap();
//! let events = engine.apply_rule("MP", &[1.into(), 2.into()]).unwrap();
//! assert!(events.contains(&ProofEvent::GoalReached));
//! assert!(engine.is_complete());
//! ```

pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod line;
pub mod problem;
pub mod scope;

pub use command::{Command, PremiseRef};
pub use config::{EngineConfig, LogicSystem};
pub use engine::ProofEngine;
pub use error::{ErrorKind, ProofError, ProofResult};
pub use event::{ProofEvent, Severity};
pub use ledger::{Appended, Ledger, NewLine};
pub use line::{BlockId, LineId, LineKind, ProofLine};
pub use problem::{GoalSpec, Problem};
pub use scope::{ScopeStack, SubGoal};
