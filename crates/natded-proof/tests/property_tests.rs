//! Property-based tests for the proof engine
//!
//! Random command sequences are replayed against small problems and the
//! ledger/stack invariants are checked after every command.

use natded_formula::{equal, Formula};
use natded_proof::{Command, LogicSystem, PremiseRef, Problem, ProofEngine, ProofEvent};
use natded_rules::{RuleInput, Side, Source};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_atom() -> impl Strategy<Value = Formula> {
    prop::sample::select(vec!["P", "Q", "R"]).prop_map(Formula::atom)
}

fn arb_formula() -> impl Strategy<Value = Formula> {
    arb_atom().prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Formula::not),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::or(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| Formula::implies(l, r)),
        ]
    })
}

fn arb_command() -> impl Strategy<Value = Command> {
    let rule = prop::sample::select(vec!["MP", "MT", "Conj", "Simp", "Add", "DN", "MTP", "BC", "CB"]);
    let refs = prop::collection::vec(1u32..8, 1..3);
    prop_oneof![
        4 => (rule, refs).prop_map(|(rule, premises)| Command::ApplyRule {
            rule: rule.to_string(),
            premises: premises.into_iter().map(PremiseRef::Line).collect(),
            input: None,
        }),
        2 => prop::sample::select(vec![Side::Left, Side::Right])
            .prop_map(|side| Command::ProvideInput { input: RuleInput::Side(side) }),
        1 => (prop::sample::select(vec!["CP", "RAA"]), arb_formula()).prop_map(|(rule, f)| {
            Command::StartSubproof {
                rule: rule.to_string(),
                formula: f.to_string(),
                source: Source::Goal,
                premises: Vec::new(),
                input: None,
            }
        }),
        1 => arb_formula().prop_map(|f| Command::AddLine {
            text: f.to_string(),
            justification: None,
            scope: None,
        }),
        1 => Just(Command::Discharge),
    ]
}

fn check_invariants(engine: &ProofEngine) -> Result<(), TestCaseError> {
    prop_assert_eq!(engine.scope_level(), engine.subgoals().len());

    // Numbers strictly increase, Show lines are unnumbered
    let numbers: Vec<u32> = engine.lines().iter().filter_map(|l| l.number).collect();
    prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    for line in engine.lines() {
        prop_assert_eq!(line.number.is_none(), line.is_show_line());
    }

    // No two proven lines with equal formulas in the same block
    let proven: Vec<_> = engine.lines().iter().filter(|l| l.is_proven()).collect();
    for (i, a) in proven.iter().enumerate() {
        for b in &proven[i + 1..] {
            prop_assert!(
                a.block != b.block || !equal(&a.formula, &b.formula),
                "duplicate {} in block {:?}",
                a.text,
                a.block
            );
        }
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_mp_either_order(a in arb_formula(), b in arb_formula()) {
        let conditional = Formula::implies(a.clone(), b.clone());
        let goal = Formula::and(b.clone(), Formula::atom("Z"));
        for order in [[1u32, 2], [2, 1]] {
            let problem = Problem::new(
                LogicSystem::Propositional,
                &[&conditional.to_string(), &a.to_string()],
                &goal.to_string(),
            );
            let mut engine = ProofEngine::from_problem(&problem).unwrap();
            let result = engine.apply_rule("MP", &[order[0].into(), order[1].into()]);
            // B may already be a premise, in which case dedupe applies
            if equal(&b, &conditional) || equal(&b, &a) {
                prop_assert!(result.is_err());
            } else {
                prop_assert!(result.is_ok());
                prop_assert!(equal(&engine.lines()[2].formula, &b));
            }
        }
    }

    #[test]
    fn prop_failed_commands_change_nothing(commands in prop::collection::vec(arb_command(), 1..25)) {
        let problem = Problem::new(
            LogicSystem::Propositional,
            &["P → Q", "P ∧ R", "~Q ∨ S", "Q ↔ R"],
            "S",
        );
        let mut engine = ProofEngine::from_problem(&problem).unwrap();
        for command in commands {
            let before = engine.lines().len();
            let depth = engine.scope_level();
            let events = engine.dispatch(command);
            if events.iter().any(ProofEvent::is_error) {
                prop_assert_eq!(events.len(), 1);
                prop_assert_eq!(engine.lines().len(), before);
                prop_assert_eq!(engine.scope_level(), depth);
            }
            check_invariants(&engine)?;
        }
    }
}
