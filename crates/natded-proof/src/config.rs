//! Engine configuration

use natded_rules::{LogicTier, RuleKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logic system of a problem; selects which rule tiers are available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicSystem {
    #[default]
    Propositional,
    /// Propositional rules plus the modal rules
    Modal,
    /// Propositional rules plus the quantifier rules
    #[serde(alias = "predicate", alias = "fol", alias = "first_order")]
    FirstOrder,
}

impl LogicSystem {
    pub fn tiers(self) -> &'static [LogicTier] {
        match self {
            LogicSystem::Propositional => &[LogicTier::Propositional],
            LogicSystem::Modal => &[LogicTier::Propositional, LogicTier::Modal],
            LogicSystem::FirstOrder => &[LogicTier::Propositional, LogicTier::FirstOrder],
        }
    }

    pub fn allows(self, rule: RuleKind) -> bool {
        self.tiers().contains(&rule.tier())
    }

    pub fn rules(self) -> impl Iterator<Item = RuleKind> {
        RuleKind::available(self.tiers())
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicSystem::Propositional => "propositional",
            LogicSystem::Modal => "modal",
            LogicSystem::FirstOrder => "first-order",
        }
    }
}

impl fmt::Display for LogicSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub system: LogicSystem,
    /// Close a subproof as soon as its goal is reached
    pub auto_discharge: bool,
    /// Accept `add_line` commands
    pub allow_manual_lines: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            system: LogicSystem::Propositional,
            auto_discharge: true,
            allow_manual_lines: true,
        }
    }
}

impl EngineConfig {
    pub fn for_system(system: LogicSystem) -> Self {
        EngineConfig {
            system,
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_aliases() {
        let parsed: LogicSystem = serde_json::from_str("\"fol\"").unwrap();
        assert_eq!(parsed, LogicSystem::FirstOrder);
        let parsed: LogicSystem = serde_json::from_str("\"predicate\"").unwrap();
        assert_eq!(parsed, LogicSystem::FirstOrder);
        let parsed: LogicSystem = serde_json::from_str("\"firstOrder\"").unwrap();
        assert_eq!(parsed, LogicSystem::FirstOrder);
        let parsed: LogicSystem = serde_json::from_str("\"modal\"").unwrap();
        assert_eq!(parsed, LogicSystem::Modal);
    }

    #[test]
    fn test_tiers() {
        assert!(LogicSystem::Propositional.allows(RuleKind::MP));
        assert!(!LogicSystem::Propositional.allows(RuleKind::Strict));
        assert!(LogicSystem::Modal.allows(RuleKind::Strict));
        assert!(!LogicSystem::Modal.allows(RuleKind::UI));
        assert!(LogicSystem::FirstOrder.allows(RuleKind::UI));
    }

    #[test]
    fn test_config_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"system": "modal"}"#).unwrap();
        assert_eq!(config.system, LogicSystem::Modal);
        assert!(config.auto_discharge);
        assert!(config.allow_manual_lines);
    }
}
