//! Rule registry.
//!
//! Every inference rule is a [`RuleKind`] variant with a static
//! [`RuleInfo`] record describing its premise slots. Slot descriptors are
//! checked by [`RuleKind::check_slots`] before a rule is applied, so a
//! premise from the wrong place or of the wrong shape is rejected with a
//! message naming the slot.

use crate::error::{RuleError, RuleResult};
use natded_formula::{BinOp, Formula, ModalOp, Quantifier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Logic tier a rule belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicTier {
    Propositional,
    Modal,
    FirstOrder,
}

/// Where a premise may come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// An existing line of the proof
    ProofLine,
    /// A formula typed into the scratch workspace
    Workspace,
    /// The goal area (the overall goal or a pending Show)
    Goal,
}

impl Source {
    fn describe(self) -> &'static str {
        match self {
            Source::ProofLine => "a proof line",
            Source::Workspace => "the workspace",
            Source::Goal => "the goal",
        }
    }
}

/// Concrete origin of one premise handed to a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A numbered proof line
    Line(u32),
    Workspace,
    Goal,
}

impl Origin {
    pub fn source(self) -> Source {
        match self {
            Origin::Line(_) => Source::ProofLine,
            Origin::Workspace => Source::Workspace,
            Origin::Goal => Source::Goal,
        }
    }

    pub fn line(self) -> Option<u32> {
        match self {
            Origin::Line(n) => Some(n),
            _ => None,
        }
    }
}

/// A premise: a formula together with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Premise {
    pub formula: Formula,
    pub origin: Origin,
}

impl Premise {
    pub fn new(formula: Formula, origin: Origin) -> Self {
        Premise { formula, origin }
    }

    pub fn line(formula: Formula, number: u32) -> Self {
        Premise::new(formula, Origin::Line(number))
    }

    pub fn workspace(formula: Formula) -> Self {
        Premise::new(formula, Origin::Workspace)
    }

    pub fn goal(formula: Formula) -> Self {
        Premise::new(formula, Origin::Goal)
    }
}

/// Structural requirement on the formula dropped into a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPattern {
    Any,
    Negation,
    Conjunction,
    Disjunction,
    Conditional,
    Biconditional,
    Necessity,
    Universal,
    Existential,
}

impl SlotPattern {
    pub fn matches(self, formula: &Formula) -> bool {
        match self {
            SlotPattern::Any => true,
            SlotPattern::Negation => formula.as_negation().is_some(),
            SlotPattern::Conjunction => formula.as_binary(BinOp::And).is_some(),
            SlotPattern::Disjunction => formula.as_binary(BinOp::Or).is_some(),
            SlotPattern::Conditional => formula.as_binary(BinOp::Implies).is_some(),
            SlotPattern::Biconditional => formula.as_binary(BinOp::Iff).is_some(),
            SlotPattern::Necessity => formula.as_modal(ModalOp::Necessarily).is_some(),
            SlotPattern::Universal => formula.as_quantified(Quantifier::Forall).is_some(),
            SlotPattern::Existential => formula.as_quantified(Quantifier::Exists).is_some(),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            SlotPattern::Any => "a formula",
            SlotPattern::Negation => "a negation ~A",
            SlotPattern::Conjunction => "a conjunction A ∧ B",
            SlotPattern::Disjunction => "a disjunction A ∨ B",
            SlotPattern::Conditional => "a conditional A → B",
            SlotPattern::Biconditional => "a biconditional A ↔ B",
            SlotPattern::Necessity => "a necessity □A",
            SlotPattern::Universal => "a universal ∀x A",
            SlotPattern::Existential => "an existential ∃x A",
        }
    }
}

/// One premise position of a rule.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    pub placeholder: &'static str,
    pub pattern: SlotPattern,
    pub sources: &'static [Source],
}

// A struct literal keeps the slot tables promotable to 'static
macro_rules! slot {
    ($placeholder:expr, $pattern:expr, $sources:expr) => {
        Slot {
            placeholder: $placeholder,
            pattern: $pattern,
            sources: $sources,
        }
    };
}

const PROOF: &[Source] = &[Source::ProofLine];
const PROOF_OR_WORKSPACE: &[Source] = &[Source::ProofLine, Source::Workspace];
const GOAL_AREA: &[Source] = &[Source::Goal, Source::Workspace];

/// Declarative description of a rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleInfo {
    /// Name shown in justifications
    pub name: &'static str,
    /// Other accepted spellings
    pub aliases: &'static [&'static str],
    pub tier: LogicTier,
    pub is_subproof: bool,
    pub slots: &'static [Slot],
}

impl RuleInfo {
    pub fn premise_count(&self) -> usize {
        self.slots.len()
    }
}

/// The closed set of inference rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RuleKind {
    // Propositional
    MP,
    MT,
    Conj,
    Simp,
    Add,
    DN,
    MTP,
    BC,
    CB,
    CP,
    RAA,
    // Modal
    Strict,
    BoxImport,
    BoxElim,
    PossDef,
    // First-order
    UI,
    EI,
    UG,
    EG,
    EE,
}

impl RuleKind {
    pub const ALL: [RuleKind; 20] = [
        RuleKind::MP,
        RuleKind::MT,
        RuleKind::Conj,
        RuleKind::Simp,
        RuleKind::Add,
        RuleKind::DN,
        RuleKind::MTP,
        RuleKind::BC,
        RuleKind::CB,
        RuleKind::CP,
        RuleKind::RAA,
        RuleKind::Strict,
        RuleKind::BoxImport,
        RuleKind::BoxElim,
        RuleKind::PossDef,
        RuleKind::UI,
        RuleKind::EI,
        RuleKind::UG,
        RuleKind::EG,
        RuleKind::EE,
    ];

    pub fn info(self) -> &'static RuleInfo {
        use LogicTier::*;
        use SlotPattern as P;
        match self {
            RuleKind::MP => &RuleInfo {
                name: "MP",
                aliases: &["→E", "modus ponens"],
                tier: Propositional,
                is_subproof: false,
                slots: &[
                    slot!("first premise", P::Any, PROOF),
                    slot!("second premise", P::Any, PROOF),
                ],
            },
            RuleKind::MT => &RuleInfo {
                name: "MT",
                aliases: &["modus tollens"],
                tier: Propositional,
                is_subproof: false,
                slots: &[
                    slot!("conditional", P::Conditional, PROOF),
                    slot!("negated consequent", P::Negation, PROOF),
                ],
            },
            RuleKind::Conj => &RuleInfo {
                name: "Conj",
                aliases: &["∧I", "&I"],
                tier: Propositional,
                is_subproof: false,
                slots: &[
                    slot!("left conjunct", P::Any, PROOF),
                    slot!("right conjunct", P::Any, PROOF),
                ],
            },
            RuleKind::Simp => &RuleInfo {
                name: "Simp",
                aliases: &["∧E", "&E"],
                tier: Propositional,
                is_subproof: false,
                slots: &[slot!("conjunction", P::Conjunction, PROOF)],
            },
            RuleKind::Add => &RuleInfo {
                name: "Add",
                aliases: &["∨I", "vI"],
                tier: Propositional,
                is_subproof: false,
                slots: &[
                    slot!("disjunct", P::Any, PROOF),
                    slot!("added disjunct", P::Any, PROOF_OR_WORKSPACE),
                ],
            },
            RuleKind::DN => &RuleInfo {
                name: "DN",
                aliases: &["double negation"],
                tier: Propositional,
                is_subproof: false,
                slots: &[slot!("formula", P::Any, PROOF)],
            },
            RuleKind::MTP => &RuleInfo {
                name: "MTP",
                aliases: &["DS"],
                tier: Propositional,
                is_subproof: false,
                slots: &[
                    slot!("disjunction", P::Disjunction, PROOF),
                    slot!("negated disjunct", P::Negation, PROOF),
                ],
            },
            RuleKind::BC => &RuleInfo {
                name: "BC",
                aliases: &["↔E"],
                tier: Propositional,
                is_subproof: false,
                slots: &[slot!("biconditional", P::Biconditional, PROOF)],
            },
            RuleKind::CB => &RuleInfo {
                name: "CB",
                aliases: &["↔I"],
                tier: Propositional,
                is_subproof: false,
                slots: &[
                    slot!("conditional", P::Conditional, PROOF),
                    slot!("converse conditional", P::Conditional, PROOF),
                ],
            },
            RuleKind::CP => &RuleInfo {
                name: "CP",
                aliases: &["→I"],
                tier: Propositional,
                is_subproof: true,
                slots: &[slot!("goal", P::Conditional, GOAL_AREA)],
            },
            RuleKind::RAA => &RuleInfo {
                name: "RAA",
                aliases: &["IP", "~I"],
                tier: Propositional,
                is_subproof: true,
                slots: &[slot!("goal", P::Any, GOAL_AREA)],
            },
            RuleKind::Strict => &RuleInfo {
                name: "Strict",
                aliases: &["□I", "SP"],
                tier: Modal,
                is_subproof: true,
                slots: &[slot!("goal", P::Necessity, GOAL_AREA)],
            },
            RuleKind::BoxImport => &RuleInfo {
                name: "□Imp",
                aliases: &["Imp", "BoxImp", "import"],
                tier: Modal,
                is_subproof: false,
                slots: &[slot!("necessity", P::Necessity, PROOF)],
            },
            RuleKind::BoxElim => &RuleInfo {
                name: "□E",
                aliases: &["BoxE", "T"],
                tier: Modal,
                is_subproof: false,
                slots: &[slot!("necessity", P::Necessity, PROOF)],
            },
            RuleKind::PossDef => &RuleInfo {
                name: "◊Def",
                aliases: &["PosDef", "DiaDef"],
                tier: Modal,
                is_subproof: false,
                slots: &[slot!("formula", P::Any, PROOF)],
            },
            RuleKind::UI => &RuleInfo {
                name: "UI",
                aliases: &["∀E"],
                tier: FirstOrder,
                is_subproof: false,
                slots: &[slot!("universal", P::Universal, PROOF)],
            },
            RuleKind::EI => &RuleInfo {
                name: "EI",
                aliases: &["∃inst"],
                tier: FirstOrder,
                is_subproof: false,
                slots: &[slot!("existential", P::Existential, PROOF)],
            },
            RuleKind::UG => &RuleInfo {
                name: "UG",
                aliases: &["∀I"],
                tier: FirstOrder,
                is_subproof: false,
                slots: &[slot!("instance", P::Any, PROOF)],
            },
            RuleKind::EG => &RuleInfo {
                name: "EG",
                aliases: &["∃I"],
                tier: FirstOrder,
                is_subproof: false,
                slots: &[slot!("instance", P::Any, PROOF)],
            },
            RuleKind::EE => &RuleInfo {
                name: "EE",
                aliases: &["∃E"],
                tier: FirstOrder,
                is_subproof: true,
                slots: &[
                    slot!("existential", P::Existential, PROOF),
                    slot!("goal", P::Any, GOAL_AREA),
                ],
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn tier(self) -> LogicTier {
        self.info().tier
    }

    pub fn is_subproof(self) -> bool {
        self.info().is_subproof
    }

    pub fn premise_count(self) -> usize {
        self.info().premise_count()
    }

    /// Look a rule up by name or alias, ignoring ASCII case.
    pub fn lookup(name: &str) -> Option<RuleKind> {
        let name = name.trim();
        RuleKind::ALL.into_iter().find(|kind| {
            let info = kind.info();
            info.name.eq_ignore_ascii_case(name)
                || info.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
                || format!("{kind:?}").eq_ignore_ascii_case(name)
        })
    }

    /// Rules available in a tier set.
    pub fn available(tiers: &[LogicTier]) -> impl Iterator<Item = RuleKind> + '_ {
        RuleKind::ALL
            .into_iter()
            .filter(move |kind| tiers.contains(&kind.tier()))
    }

    /// Validate premise count, sources and shapes against the slots.
    ///
    /// A shape failure on the goal slot of a subproof rule is reported as
    /// [`RuleError::Shape`]; every other failure names the slot.
    ///
    /// # Errors
    ///
    /// Returns the first slot violation found, in slot order.
    pub fn check_slots(self, premises: &[Premise]) -> RuleResult<()> {
        let info = self.info();
        if premises.len() != info.premise_count() {
            return Err(RuleError::Arity {
                rule: info.name,
                expected: info.premise_count(),
                found: premises.len(),
            });
        }
        for (slot, premise) in info.slots.iter().zip(premises) {
            if !slot.sources.contains(&premise.origin.source()) {
                return Err(RuleError::Source {
                    rule: info.name,
                    placeholder: slot.placeholder,
                    allowed: slot
                        .sources
                        .iter()
                        .map(|s| s.describe())
                        .collect::<Vec<_>>()
                        .join(" or "),
                });
            }
            if !slot.pattern.matches(&premise.formula) {
                if info.is_subproof && slot.sources == GOAL_AREA {
                    return Err(RuleError::Shape {
                        rule: info.name,
                        expected: slot.pattern.describe(),
                        found: premise.formula.to_string(),
                    });
                }
                return Err(RuleError::Pattern {
                    rule: info.name,
                    placeholder: slot.placeholder,
                    expected: slot.pattern.describe(),
                    found: premise.formula.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised rule name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rule '{0}'")]
pub struct UnknownRule(pub String);

impl FromStr for RuleKind {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::lookup(s).ok_or_else(|| UnknownRule(s.to_string()))
    }
}

impl TryFrom<String> for RuleKind {
    type Error = UnknownRule;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuleKind> for String {
    fn from(kind: RuleKind) -> Self {
        kind.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natded_formula::parse;

    fn line(text: &str, n: u32) -> Premise {
        Premise::line(parse(text).unwrap(), n)
    }

    #[test]
    fn test_every_rule_has_static_info() {
        let infos: Vec<&'static RuleInfo> = RuleKind::ALL.iter().map(|r| r.info()).collect();
        for (rule, info) in RuleKind::ALL.iter().zip(&infos) {
            assert!(!info.slots.is_empty(), "{rule:?} has no slots");
            assert_eq!(rule.premise_count(), info.slots.len());
            assert!(info.slots.iter().all(|s| !s.sources.is_empty()));
        }
        assert_eq!(RuleKind::EE.info().slots[1].placeholder, "goal");
        assert_eq!(RuleKind::EE.info().slots[1].sources, GOAL_AREA);
    }

    #[test]
    fn test_lookup_by_name_and_alias() {
        assert_eq!(RuleKind::lookup("MP"), Some(RuleKind::MP));
        assert_eq!(RuleKind::lookup("mp"), Some(RuleKind::MP));
        assert_eq!(RuleKind::lookup("∧I"), Some(RuleKind::Conj));
        assert_eq!(RuleKind::lookup("□I"), Some(RuleKind::Strict));
        assert_eq!(RuleKind::lookup("import"), Some(RuleKind::BoxImport));
        assert_eq!(RuleKind::lookup("BoxImport"), Some(RuleKind::BoxImport));
        assert_eq!(RuleKind::lookup("nonsense"), None);
        assert!("nonsense".parse::<RuleKind>().is_err());
    }

    #[test]
    fn test_names_are_unique() {
        for a in RuleKind::ALL {
            for b in RuleKind::ALL {
                if a != b {
                    assert_ne!(a.name(), b.name());
                    assert_eq!(RuleKind::lookup(a.name()), Some(a));
                }
            }
        }
    }

    #[test]
    fn test_tiers() {
        let propositional: Vec<_> = RuleKind::available(&[LogicTier::Propositional]).collect();
        assert!(propositional.contains(&RuleKind::MP));
        assert!(!propositional.contains(&RuleKind::Strict));
        assert!(!propositional.contains(&RuleKind::UI));
        assert!(RuleKind::CP.is_subproof());
        assert!(!RuleKind::MP.is_subproof());
        assert_eq!(RuleKind::MT.premise_count(), 2);
    }

    #[test]
    fn test_check_slots_arity() {
        let err = RuleKind::MP.check_slots(&[line("P", 1)]).unwrap_err();
        assert!(matches!(err, RuleError::Arity { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_check_slots_source() {
        let premises = [line("P → Q", 1), Premise::workspace(parse("P").unwrap())];
        let err = RuleKind::MP.check_slots(&premises).unwrap_err();
        assert!(matches!(err, RuleError::Source { placeholder: "second premise", .. }));

        // Add accepts a workspace formula in its second slot
        let premises = [line("P", 1), Premise::workspace(parse("Q").unwrap())];
        assert!(RuleKind::Add.check_slots(&premises).is_ok());
    }

    #[test]
    fn test_check_slots_pattern() {
        let err = RuleKind::MT.check_slots(&[line("P", 1), line("~Q", 2)]).unwrap_err();
        assert!(matches!(err, RuleError::Pattern { placeholder: "conditional", .. }));
        assert!(err.to_string().contains("conditional"));
    }

    #[test]
    fn test_subproof_goal_shape_error() {
        let err = RuleKind::CP
            .check_slots(&[Premise::goal(parse("P ∧ Q").unwrap())])
            .unwrap_err();
        assert!(matches!(err, RuleError::Shape { rule: "CP", .. }));

        let err = RuleKind::Strict
            .check_slots(&[Premise::goal(parse("P → Q").unwrap())])
            .unwrap_err();
        assert!(matches!(err, RuleError::Shape { rule: "Strict", .. }));

        assert!(RuleKind::RAA
            .check_slots(&[Premise::goal(parse("P ∧ Q").unwrap())])
            .is_ok());
    }

    #[test]
    fn test_string_conversions_use_names() {
        assert_eq!(String::from(RuleKind::Strict), "Strict");
        assert_eq!(String::from(RuleKind::BoxImport), "□Imp");
        assert_eq!(RuleKind::try_from("□E".to_string()), Ok(RuleKind::BoxElim));
    }
}
