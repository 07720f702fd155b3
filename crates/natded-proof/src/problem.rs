//! Problem definitions

use crate::config::LogicSystem;
use crate::error::{ProofError, ProofResult};
use natded_formula::{parse, Formula};
use serde::{Deserialize, Serialize};

/// An exercise: premises, a goal, and the logic system to use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub system: LogicSystem,
    #[serde(default)]
    pub premises: Vec<String>,
    pub goal: GoalSpec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub formula: String,
}

impl Problem {
    pub fn new(system: LogicSystem, premises: &[&str], goal: &str) -> Self {
        Problem {
            system,
            premises: premises.iter().map(|p| p.to_string()).collect(),
            goal: GoalSpec {
                formula: goal.to_string(),
            },
        }
    }

    /// Parse a problem from its JSON form.
    pub fn from_json(text: &str) -> ProofResult<Self> {
        serde_json::from_str(text).map_err(|e| ProofError::Problem(e.to_string()))
    }

    /// Parse premises and goal.
    pub fn formulas(&self) -> ProofResult<(Vec<Formula>, Formula)> {
        let premises = self
            .premises
            .iter()
            .map(|p| parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        let goal = parse(&self.goal.formula)?;
        Ok((premises, goal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let problem = Problem::from_json(
            r#"{"system": "modal", "premises": ["□(P → Q)", "□P"], "goal": {"formula": "□Q"}}"#,
        )
        .unwrap();
        assert_eq!(problem.system, LogicSystem::Modal);
        assert_eq!(problem.premises.len(), 2);
        let (premises, goal) = problem.formulas().unwrap();
        assert_eq!(premises[1].to_string(), "□P");
        assert_eq!(goal.to_string(), "□Q");
    }

    #[test]
    fn test_defaults_and_errors() {
        let problem = Problem::from_json(r#"{"goal": {"formula": "P → P"}}"#).unwrap();
        assert_eq!(problem.system, LogicSystem::Propositional);
        assert!(problem.premises.is_empty());

        assert!(matches!(
            Problem::from_json(r#"{"premises": []}"#),
            Err(ProofError::Problem(_))
        ));
        let bad = Problem::new(LogicSystem::Propositional, &["P ∧"], "P");
        assert!(matches!(bad.formulas(), Err(ProofError::Parse(_))));
    }
}
