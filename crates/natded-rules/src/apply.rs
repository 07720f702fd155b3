//! Rule application.
//!
//! [`RuleKind::apply`] turns checked premises into either a conclusion or a
//! plan for a new subproof. Application is pure: it never sees the proof
//! state, so freshness of witnesses and the restrictions on UG are left to
//! the caller.

use crate::error::{RuleError, RuleResult};
use crate::input::{InputKind, InputRequest, RuleInput, Side};
use crate::rule::{Premise, RuleKind};
use crate::subproof::{SubproofKind, SubproofPlan};
use natded_formula::{equal, parse_term, BinOp, Formula, ModalOp, Quantifier, Term};

/// What a successful application produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleOutput {
    /// A new line for the active block
    Conclusion(Formula),
    /// A subproof to open
    OpenSubproof(SubproofPlan),
}

impl RuleOutput {
    pub fn conclusion(&self) -> Option<&Formula> {
        match self {
            RuleOutput::Conclusion(f) => Some(f),
            RuleOutput::OpenSubproof(_) => None,
        }
    }

    pub fn plan(&self) -> Option<&SubproofPlan> {
        match self {
            RuleOutput::OpenSubproof(plan) => Some(plan),
            RuleOutput::Conclusion(_) => None,
        }
    }
}

impl RuleKind {
    /// Apply the rule to premises given in slot order.
    ///
    /// # Errors
    ///
    /// Slot violations, premises that do not fit together, and missing or
    /// unusable input are all reported as [`RuleError`]. A rule that needs a
    /// decision and was given none returns [`RuleError::InputRequired`].
    pub fn apply(self, premises: &[Premise], input: Option<&RuleInput>) -> RuleResult<RuleOutput> {
        self.check_slots(premises)?;
        let formulas: Vec<&Formula> = premises.iter().map(|p| &p.formula).collect();
        let f = |i: usize| formulas[i];
        let out = match self {
            RuleKind::MP => modus_ponens(f(0), f(1))?,
            RuleKind::MT => modus_tollens(f(0), f(1))?,
            RuleKind::Conj => Formula::and(f(0).clone(), f(1).clone()),
            RuleKind::Simp => simplification(f(0), input)?,
            RuleKind::Add => Formula::or(f(0).clone(), f(1).clone()),
            RuleKind::DN => double_negation(f(0)),
            RuleKind::MTP => modus_tollendo_ponens(f(0), f(1))?,
            RuleKind::BC => biconditional_to_conditional(f(0), input)?,
            RuleKind::CB => conditionals_to_biconditional(f(0), f(1))?,
            RuleKind::CP => return conditional_proof(f(0)).map(RuleOutput::OpenSubproof),
            RuleKind::RAA => return Ok(RuleOutput::OpenSubproof(reductio(f(0)))),
            RuleKind::Strict => return strict_proof(f(0)).map(RuleOutput::OpenSubproof),
            RuleKind::EE => {
                return existential_elimination(f(0), f(1), input).map(RuleOutput::OpenSubproof)
            }
            RuleKind::BoxImport | RuleKind::BoxElim => strip_box(self, f(0))?,
            RuleKind::PossDef => possibility_definition(f(0))?,
            RuleKind::UI => universal_instantiation(f(0), input)?,
            RuleKind::EI => existential_instantiation(f(0), input)?,
            RuleKind::UG => universal_generalization(f(0), input)?,
            RuleKind::EG => existential_generalization(f(0), input)?,
        };
        Ok(RuleOutput::Conclusion(out))
    }
}

// ============================================================================
// Propositional rules
// ============================================================================

// MP: X → Y, X ⊢ Y in either premise order
fn modus_ponens(a: &Formula, b: &Formula) -> RuleResult<Formula> {
    for (major, minor) in [(a, b), (b, a)] {
        if let Some((antecedent, consequent)) = major.as_conditional() {
            if equal(antecedent, minor) {
                return Ok(consequent.clone());
            }
        }
    }
    let message = if a.as_conditional().is_none() && b.as_conditional().is_none() {
        "one premise must be a conditional".to_string()
    } else {
        format!("neither {a} nor {b} is the antecedent of the other")
    };
    Err(RuleError::mismatch("MP", message))
}

// MT: X → Y, ~Y ⊢ ~X
fn modus_tollens(conditional: &Formula, negation: &Formula) -> RuleResult<Formula> {
    let (antecedent, consequent) = conditional
        .as_conditional()
        .ok_or_else(|| RuleError::mismatch("MT", "the first premise must be a conditional"))?;
    let denied = negation
        .as_negation()
        .ok_or_else(|| RuleError::mismatch("MT", "the second premise must be a negation"))?;
    if !equal(denied, consequent) {
        return Err(RuleError::mismatch(
            "MT",
            format!("{negation} does not deny the consequent {consequent}"),
        ));
    }
    Ok(Formula::not(antecedent.clone()))
}

// Simp: A ∧ B ⊢ A or B, as chosen
fn simplification(conjunction: &Formula, input: Option<&RuleInput>) -> RuleResult<Formula> {
    let (left, right) = conjunction
        .as_binary(BinOp::And)
        .ok_or_else(|| RuleError::mismatch("Simp", "the premise must be a conjunction"))?;
    match input {
        None => Err(RuleError::InputRequired(
            InputRequest::new(RuleKind::Simp, InputKind::Side, "which conjunct should be kept?")
                .with_choice(RuleInput::Side(Side::Left), left.to_string())
                .with_choice(RuleInput::Side(Side::Right), right.to_string()),
        )),
        Some(RuleInput::Side(Side::Left)) => Ok(left.clone()),
        Some(RuleInput::Side(Side::Right)) => Ok(right.clone()),
        Some(other) => Err(RuleError::bad_input(
            "Simp",
            format!("expected left or right, got {other}"),
        )),
    }
}

// DN: ~~A ⊢ A, otherwise A ⊢ ~~A
fn double_negation(formula: &Formula) -> Formula {
    match formula.as_negation().and_then(Formula::as_negation) {
        Some(inner) => inner.clone(),
        None => Formula::not(Formula::not(formula.clone())),
    }
}

// MTP: A ∨ B, ~A ⊢ B and A ∨ B, ~B ⊢ A
fn modus_tollendo_ponens(disjunction: &Formula, negation: &Formula) -> RuleResult<Formula> {
    let (left, right) = disjunction
        .as_binary(BinOp::Or)
        .ok_or_else(|| RuleError::mismatch("MTP", "the first premise must be a disjunction"))?;
    let denied = negation
        .as_negation()
        .ok_or_else(|| RuleError::mismatch("MTP", "the second premise must be a negation"))?;
    if equal(denied, left) {
        Ok(right.clone())
    } else if equal(denied, right) {
        Ok(left.clone())
    } else {
        Err(RuleError::mismatch(
            "MTP",
            format!("{negation} denies neither disjunct of {disjunction}"),
        ))
    }
}

// BC: A ↔ B ⊢ A → B (left) or B → A (right)
fn biconditional_to_conditional(bicond: &Formula, input: Option<&RuleInput>) -> RuleResult<Formula> {
    let (left, right) = bicond
        .as_binary(BinOp::Iff)
        .ok_or_else(|| RuleError::mismatch("BC", "the premise must be a biconditional"))?;
    let forward = || Formula::implies(left.clone(), right.clone());
    let backward = || Formula::implies(right.clone(), left.clone());
    match input {
        None => Err(RuleError::InputRequired(
            InputRequest::new(RuleKind::BC, InputKind::Side, "which direction should be kept?")
                .with_choice(RuleInput::Side(Side::Left), forward().to_string())
                .with_choice(RuleInput::Side(Side::Right), backward().to_string()),
        )),
        Some(RuleInput::Side(Side::Left)) => Ok(forward()),
        Some(RuleInput::Side(Side::Right)) => Ok(backward()),
        Some(other) => Err(RuleError::bad_input(
            "BC",
            format!("expected left or right, got {other}"),
        )),
    }
}

// CB: A → B, B → A ⊢ A ↔ B
fn conditionals_to_biconditional(first: &Formula, second: &Formula) -> RuleResult<Formula> {
    let (a, b) = first
        .as_conditional()
        .ok_or_else(|| RuleError::mismatch("CB", "the first premise must be a conditional"))?;
    let (c, d) = second
        .as_conditional()
        .ok_or_else(|| RuleError::mismatch("CB", "the second premise must be a conditional"))?;
    if !(equal(a, d) && equal(b, c)) {
        return Err(RuleError::mismatch(
            "CB",
            format!("{second} is not the converse of {first}"),
        ));
    }
    Ok(Formula::iff(a.clone(), b.clone()))
}

// ============================================================================
// Subproof rules
// ============================================================================

fn conditional_proof(goal: &Formula) -> RuleResult<SubproofPlan> {
    let (antecedent, consequent) = goal.as_conditional().ok_or_else(|| RuleError::Shape {
        rule: "CP",
        expected: "A → B",
        found: goal.to_string(),
    })?;
    Ok(SubproofPlan {
        kind: SubproofKind::CP,
        show: goal.clone(),
        assumption: Some(antecedent.clone()),
        goal: consequent.clone(),
        conclusion: goal.clone(),
        witness: None,
    })
}

/// Dropping `~X` assumes `X` and proves `~X`. Any other `D` is assumed
/// as is and a contradiction yields `~D`.
fn reductio(dropped: &Formula) -> SubproofPlan {
    let (assumption, negated) = match dropped.as_negation() {
        Some(inner) => (inner.clone(), dropped.clone()),
        None => (dropped.clone(), Formula::not(dropped.clone())),
    };
    SubproofPlan {
        kind: SubproofKind::RAA,
        show: negated.clone(),
        assumption: Some(assumption),
        goal: negated.clone(),
        conclusion: negated,
        witness: None,
    }
}

fn strict_proof(goal: &Formula) -> RuleResult<SubproofPlan> {
    let inner = goal
        .as_modal(ModalOp::Necessarily)
        .ok_or_else(|| RuleError::Shape {
            rule: "Strict",
            expected: "□A",
            found: goal.to_string(),
        })?;
    Ok(SubproofPlan {
        kind: SubproofKind::Strict,
        show: goal.clone(),
        assumption: None,
        goal: inner.clone(),
        conclusion: goal.clone(),
        witness: None,
    })
}

// EE: ∃x φ, [φ[a/x] ... C] ⊢ C
fn existential_elimination(
    existential: &Formula,
    goal: &Formula,
    input: Option<&RuleInput>,
) -> RuleResult<SubproofPlan> {
    let (var, body) = existential
        .as_quantified(Quantifier::Exists)
        .ok_or_else(|| RuleError::mismatch("EE", "the first premise must be an existential"))?;
    let witness = match input {
        None => {
            return Err(RuleError::InputRequired(witness_request(
                RuleKind::EE,
                &[existential, goal],
            )))
        }
        Some(RuleInput::Witness(name)) => witness_term("EE", name, existential)?,
        Some(other) => {
            return Err(RuleError::bad_input(
                "EE",
                format!("expected a witness name, got {other}"),
            ))
        }
    };
    if goal.mentions(witness.name()) {
        return Err(RuleError::bad_input(
            "EE",
            format!("the witness {witness} must not occur in the goal {goal}"),
        ));
    }
    Ok(SubproofPlan {
        kind: SubproofKind::EE,
        show: goal.clone(),
        assumption: Some(body.substitute(var, &witness)),
        goal: goal.clone(),
        conclusion: goal.clone(),
        witness: Some(witness.name().to_string()),
    })
}

// ============================================================================
// Modal rules
// ============================================================================

// □Imp and □E: □A ⊢ A; they differ only in where the engine allows them
fn strip_box(kind: RuleKind, formula: &Formula) -> RuleResult<Formula> {
    formula
        .as_modal(ModalOp::Necessarily)
        .cloned()
        .ok_or_else(|| RuleError::mismatch(kind.name(), "the premise must be a necessity"))
}

// ◊Def: ◊A ⊢ ~□~A and ~□~A ⊢ ◊A
fn possibility_definition(formula: &Formula) -> RuleResult<Formula> {
    if let Some(inner) = formula.as_modal(ModalOp::Possibly) {
        return Ok(Formula::not(Formula::boxed(Formula::not(inner.clone()))));
    }
    formula
        .as_negation()
        .and_then(|f| f.as_modal(ModalOp::Necessarily))
        .and_then(Formula::as_negation)
        .map(|inner| Formula::diamond(inner.clone()))
        .ok_or_else(|| {
            RuleError::mismatch("◊Def", format!("{formula} is neither ◊A nor ~□~A"))
        })
}

// ============================================================================
// First-order rules
// ============================================================================

// UI: ∀x φ ⊢ φ[t/x]
fn universal_instantiation(universal: &Formula, input: Option<&RuleInput>) -> RuleResult<Formula> {
    let (var, body) = universal
        .as_quantified(Quantifier::Forall)
        .ok_or_else(|| RuleError::mismatch("UI", "the premise must be a universal"))?;
    match input {
        None => {
            let mut request =
                InputRequest::new(RuleKind::UI, InputKind::Term, format!("instantiate {var} with which term?"));
            let suggestions = universal
                .terms()
                .into_iter()
                .filter(|t| !t.is_var() || universal.occurs_free(t.name()));
            for term in suggestions {
                let label = term.to_string();
                request = request.with_choice(RuleInput::Term(term), label);
            }
            Err(RuleError::InputRequired(request))
        }
        Some(RuleInput::Term(term)) => {
            check_term("UI", term)?;
            if body.captures(var, term) {
                return Err(RuleError::bad_input(
                    "UI",
                    format!("{term} would be captured by a quantifier in {body}"),
                ));
            }
            Ok(body.substitute(var, term))
        }
        Some(other) => Err(RuleError::bad_input(
            "UI",
            format!("expected a term, got {other}"),
        )),
    }
}

// EI: ∃x φ ⊢ φ[a/x] for a new name a
fn existential_instantiation(
    existential: &Formula,
    input: Option<&RuleInput>,
) -> RuleResult<Formula> {
    let (var, body) = existential
        .as_quantified(Quantifier::Exists)
        .ok_or_else(|| RuleError::mismatch("EI", "the premise must be an existential"))?;
    match input {
        None => Err(RuleError::InputRequired(witness_request(
            RuleKind::EI,
            &[existential],
        ))),
        Some(RuleInput::Witness(name)) => {
            let witness = witness_term("EI", name, existential)?;
            Ok(body.substitute(var, &witness))
        }
        Some(other) => Err(RuleError::bad_input(
            "EI",
            format!("expected a witness name, got {other}"),
        )),
    }
}

// UG: φ ⊢ ∀x φ[x/v] for a variable v
fn universal_generalization(formula: &Formula, input: Option<&RuleInput>) -> RuleResult<Formula> {
    let (term, bound) = match input {
        None => {
            let mut request = InputRequest::new(
                RuleKind::UG,
                InputKind::Generalize,
                "generalize on which variable?",
            );
            for var in formula.free_vars() {
                request = request.with_choice(
                    RuleInput::Generalize {
                        term: Term::var(var.clone()),
                        variable: var.clone(),
                    },
                    var,
                );
            }
            return Err(RuleError::InputRequired(request));
        }
        Some(RuleInput::Generalize { term, variable }) => (term, variable),
        Some(other) => {
            return Err(RuleError::bad_input(
                "UG",
                format!("expected a variable to generalize on, got {other}"),
            ))
        }
    };
    check_term("UG", term)?;
    if !term.is_var() {
        return Err(RuleError::bad_input(
            "UG",
            format!("{term} is a constant; only variables can be generalized"),
        ));
    }
    check_binder("UG", formula, term, bound)?;
    Ok(Formula::forall(
        bound.clone(),
        formula.replace_free(term, &Term::var(bound.clone())),
    ))
}

// EG: φ ⊢ ∃x φ[x/t]
fn existential_generalization(formula: &Formula, input: Option<&RuleInput>) -> RuleResult<Formula> {
    let (term, bound) = match input {
        None => {
            let bound = fresh_bound_name(formula);
            let mut request = InputRequest::new(
                RuleKind::EG,
                InputKind::Generalize,
                "which term should become the quantified variable?",
            );
            for term in formula.terms() {
                let label = format!("{term} as {bound}");
                request = request.with_choice(
                    RuleInput::Generalize {
                        term,
                        variable: bound.clone(),
                    },
                    label,
                );
            }
            return Err(RuleError::InputRequired(request));
        }
        Some(RuleInput::Generalize { term, variable }) => (term, variable),
        Some(other) => {
            return Err(RuleError::bad_input(
                "EG",
                format!("expected a term and a variable, got {other}"),
            ))
        }
    };
    check_term("EG", term)?;
    if !formula.terms().contains(term) {
        return Err(RuleError::bad_input(
            "EG",
            format!("{term} does not occur free in {formula}"),
        ));
    }
    check_binder("EG", formula, term, bound)?;
    Ok(Formula::exists(
        bound.clone(),
        formula.replace_free(term, &Term::var(bound.clone())),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

/// The bound name must be a variable that `formula` does not already use,
/// unless it is the very variable being abstracted.
fn check_binder(rule: &'static str, formula: &Formula, term: &Term, bound: &str) -> RuleResult<()> {
    if !matches!(parse_term(bound), Ok(Term::Var(_))) {
        return Err(RuleError::bad_input(
            rule,
            format!("'{bound}' is not a variable name (use u to z, optionally followed by digits)"),
        ));
    }
    let same = matches!(term, Term::Var(v) if v == bound);
    if !same && formula.mentions(bound) {
        return Err(RuleError::bad_input(
            rule,
            format!("{bound} already occurs in {formula}"),
        ));
    }
    Ok(())
}

/// A term typed by the user must read back as the very same term.
fn check_term(rule: &'static str, term: &Term) -> RuleResult<()> {
    match parse_term(term.name()) {
        Ok(parsed) if parsed == *term => Ok(()),
        Ok(_) => Err(RuleError::bad_input(
            rule,
            format!(
                "'{}' is not a {}",
                term.name(),
                if term.is_var() { "variable" } else { "constant" }
            ),
        )),
        Err(_) => Err(RuleError::bad_input(
            rule,
            format!("'{}' is not a term (one lowercase letter, optionally followed by digits)", term.name()),
        )),
    }
}

fn witness_term(rule: &'static str, name: &str, existential: &Formula) -> RuleResult<Term> {
    let witness = parse_term(name).map_err(|_| {
        RuleError::bad_input(
            rule,
            format!("'{name}' is not a valid name (one lowercase letter, optionally followed by digits)"),
        )
    })?;
    if existential.mentions(name) {
        return Err(RuleError::bad_input(
            rule,
            format!("the witness {name} already occurs in {existential}"),
        ));
    }
    Ok(witness)
}

fn witness_request(rule: RuleKind, context: &[&Formula]) -> InputRequest {
    let request = InputRequest::new(rule, InputKind::Witness, "name the new witness");
    match fresh_constant(context) {
        Some(name) => request.with_choice(RuleInput::Witness(name.clone()), name),
        None => request,
    }
}

/// First constant letter not mentioned by any of the formulas.
pub fn fresh_constant(context: &[&Formula]) -> Option<String> {
    ('a'..='t')
        .map(String::from)
        .find(|name| context.iter().all(|f| !f.mentions(name)))
}

fn fresh_bound_name(formula: &Formula) -> String {
    ['x', 'y', 'z', 'w', 'v', 'u']
        .into_iter()
        .map(String::from)
        .find(|name| !formula.mentions(name))
        .unwrap_or_else(|| "x".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use natded_formula::parse;

    fn f(text: &str) -> Formula {
        parse(text).unwrap()
    }

    fn lines(texts: &[&str]) -> Vec<Premise> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Premise::line(f(t), i as u32 + 1))
            .collect()
    }

    fn conclude(rule: RuleKind, texts: &[&str], input: Option<RuleInput>) -> RuleResult<Formula> {
        rule.apply(&lines(texts), input.as_ref()).map(|out| match out {
            RuleOutput::Conclusion(c) => c,
            RuleOutput::OpenSubproof(plan) => panic!("unexpected subproof {plan:?}"),
        })
    }

    fn assert_concludes(rule: RuleKind, texts: &[&str], input: Option<RuleInput>, expected: &str) {
        let got = conclude(rule, texts, input).unwrap();
        assert!(equal(&got, &f(expected)), "{rule} gave {got}, expected {expected}");
    }

    #[test]
    fn test_mp_either_order() {
        assert_concludes(RuleKind::MP, &["P → Q", "P"], None, "Q");
        assert_concludes(RuleKind::MP, &["P", "P → Q"], None, "Q");
        assert_concludes(RuleKind::MP, &["(P ∧ R) → Q", "P ∧ R"], None, "Q");
    }

    #[test]
    fn test_mp_rejects_wrong_minor() {
        let err = conclude(RuleKind::MP, &["P → Q", "R"], None).unwrap_err();
        assert!(matches!(err, RuleError::Mismatch { rule: "MP", .. }));
        // Never affirm the consequent
        assert!(conclude(RuleKind::MP, &["P → Q", "Q"], None).is_err());
        assert!(conclude(RuleKind::MP, &["P", "Q"], None).is_err());
    }

    #[test]
    fn test_mt() {
        assert_concludes(RuleKind::MT, &["P → Q", "~Q"], None, "~P");
        assert!(conclude(RuleKind::MT, &["P → Q", "~P"], None).is_err());
    }

    #[test]
    fn test_conj_and_add() {
        assert_concludes(RuleKind::Conj, &["P", "Q → R"], None, "P ∧ (Q → R)");
        let premises = [Premise::line(f("P"), 1), Premise::workspace(f("S"))];
        let out = RuleKind::Add.apply(&premises, None).unwrap();
        assert_eq!(out.conclusion(), Some(&f("P ∨ S")));
    }

    #[test]
    fn test_simp_asks_for_side() {
        let err = conclude(RuleKind::Simp, &["P ∧ Q"], None).unwrap_err();
        let RuleError::InputRequired(request) = err else {
            panic!("expected an input request");
        };
        assert_eq!(request.kind, InputKind::Side);
        assert_eq!(request.choices.len(), 2);
        assert_eq!(request.choices[0].label, "P");
        assert_eq!(request.choices[1].label, "Q");

        assert_concludes(RuleKind::Simp, &["P ∧ Q"], Some(RuleInput::Side(Side::Left)), "P");
        assert_concludes(RuleKind::Simp, &["P ∧ Q"], Some(RuleInput::Side(Side::Right)), "Q");
        let bad = conclude(RuleKind::Simp, &["P ∧ Q"], Some(RuleInput::Witness("a".into())));
        assert!(matches!(bad, Err(RuleError::BadInput { .. })));
    }

    #[test]
    fn test_dn_toggles() {
        assert_concludes(RuleKind::DN, &["~~P"], None, "P");
        assert_concludes(RuleKind::DN, &["P"], None, "~~P");
        assert_concludes(RuleKind::DN, &["~P"], None, "~~~P");
    }

    #[test]
    fn test_mtp() {
        assert_concludes(RuleKind::MTP, &["P ∨ Q", "~P"], None, "Q");
        assert_concludes(RuleKind::MTP, &["P ∨ Q", "~Q"], None, "P");
        assert!(conclude(RuleKind::MTP, &["P ∨ Q", "~R"], None).is_err());
    }

    #[test]
    fn test_bc_and_cb() {
        let left = Some(RuleInput::Side(Side::Left));
        let right = Some(RuleInput::Side(Side::Right));
        assert_concludes(RuleKind::BC, &["P ↔ Q"], left, "P → Q");
        assert_concludes(RuleKind::BC, &["P ↔ Q"], right, "Q → P");
        assert_concludes(RuleKind::CB, &["P → Q", "Q → P"], None, "P ↔ Q");
        assert_concludes(RuleKind::CB, &["Q → P", "P → Q"], None, "Q ↔ P");
        assert!(conclude(RuleKind::CB, &["P → Q", "P → Q"], None).is_err());
    }

    #[test]
    fn test_cp_plan() {
        let out = RuleKind::CP.apply(&[Premise::goal(f("P → Q"))], None).unwrap();
        let plan = out.plan().unwrap();
        assert_eq!(plan.kind, SubproofKind::CP);
        assert_eq!(plan.assumption, Some(f("P")));
        assert_eq!(plan.goal, f("Q"));
        assert_eq!(plan.conclusion, f("P → Q"));
    }

    #[test]
    fn test_cp_rejects_non_conditional() {
        let err = RuleKind::CP.apply(&[Premise::goal(f("P ∨ Q"))], None).unwrap_err();
        assert!(matches!(err, RuleError::Shape { rule: "CP", .. }));
    }

    #[test]
    fn test_raa_plan() {
        let out = RuleKind::RAA.apply(&[Premise::goal(f("Q"))], None).unwrap();
        let plan = out.plan().unwrap();
        assert_eq!(plan.assumption, Some(f("Q")));
        assert_eq!(plan.conclusion, f("~Q"));
    }

    #[test]
    fn test_raa_plan_on_negated_goal() {
        let out = RuleKind::RAA.apply(&[Premise::goal(f("~Q"))], None).unwrap();
        let plan = out.plan().unwrap();
        assert_eq!(plan.assumption, Some(f("Q")));
        assert_eq!(plan.show, f("~Q"));
        assert_eq!(plan.goal, f("~Q"));
        assert_eq!(plan.conclusion, f("~Q"));

        let out = RuleKind::RAA.apply(&[Premise::goal(f("~~P"))], None).unwrap();
        assert_eq!(out.plan().unwrap().assumption, Some(f("~P")));
    }

    #[test]
    fn test_strict_plan() {
        let out = RuleKind::Strict.apply(&[Premise::goal(f("□Q"))], None).unwrap();
        let plan = out.plan().unwrap();
        assert_eq!(plan.assumption, None);
        assert_eq!(plan.goal, f("Q"));
        assert_eq!(plan.conclusion, f("□Q"));
        assert!(RuleKind::Strict.apply(&[Premise::goal(f("◊Q"))], None).is_err());
    }

    #[test]
    fn test_modal_rules() {
        assert_concludes(RuleKind::BoxElim, &["□(P → Q)"], None, "P → Q");
        assert_concludes(RuleKind::BoxImport, &["□P"], None, "P");
        assert_concludes(RuleKind::PossDef, &["◊P"], None, "~□~P");
        assert_concludes(RuleKind::PossDef, &["~□~P"], None, "◊P");
        assert!(conclude(RuleKind::PossDef, &["□P"], None).is_err());
    }

    #[test]
    fn test_ui() {
        let input = Some(RuleInput::Term(Term::constant("a")));
        assert_concludes(RuleKind::UI, &["∀x(Fx → Gx)"], input, "Fa → Ga");

        // An inner binder of the same name is left alone
        let input = Some(RuleInput::Term(Term::constant("b")));
        assert_concludes(RuleKind::UI, &["∀x(Fx ∧ ∃x Gx)"], input, "Fb ∧ ∃x Gx");
    }

    #[test]
    fn test_ui_request_lists_terms() {
        let err = conclude(RuleKind::UI, &["∀x Rxa"], None).unwrap_err();
        let RuleError::InputRequired(request) = err else {
            panic!("expected an input request");
        };
        assert_eq!(request.kind, InputKind::Term);
        assert!(request
            .choices
            .iter()
            .any(|c| c.input == RuleInput::Term(Term::constant("a"))));
    }

    #[test]
    fn test_ei() {
        let input = Some(RuleInput::Witness("b".into()));
        assert_concludes(RuleKind::EI, &["∃x Fxa"], input, "Fba");
        let clash = conclude(RuleKind::EI, &["∃x Fxa"], Some(RuleInput::Witness("a".into())));
        assert!(matches!(clash, Err(RuleError::BadInput { .. })));

        let err = conclude(RuleKind::EI, &["∃x Fxa"], None).unwrap_err();
        let RuleError::InputRequired(request) = err else {
            panic!("expected an input request");
        };
        assert_eq!(request.choices[0].input, RuleInput::Witness("b".into()));
    }

    #[test]
    fn test_ug() {
        let input = Some(RuleInput::Generalize {
            term: Term::var("y"),
            variable: "x".into(),
        });
        assert_concludes(RuleKind::UG, &["Fy → Gy"], input, "∀x(Fx → Gx)");

        let constant = Some(RuleInput::Generalize {
            term: Term::constant("a"),
            variable: "x".into(),
        });
        assert!(conclude(RuleKind::UG, &["Fa"], constant).is_err());
    }

    #[test]
    fn test_eg() {
        let input = Some(RuleInput::Generalize {
            term: Term::constant("a"),
            variable: "x".into(),
        });
        assert_concludes(RuleKind::EG, &["Fa ∧ Ga"], input, "∃x(Fx ∧ Gx)");

        let captured = Some(RuleInput::Generalize {
            term: Term::constant("a"),
            variable: "x".into(),
        });
        assert!(conclude(RuleKind::EG, &["Fa ∧ ∀x Gx"], captured).is_err());
    }

    #[test]
    fn test_names_must_read_back() {
        let bad_input = |r: RuleResult<Formula>| matches!(r, Err(RuleError::BadInput { .. }));

        // Witnesses are one lowercase letter plus digits
        for name in ["ab", "", "A", "a b"] {
            let r = conclude(RuleKind::EI, &["∃x Fx"], Some(RuleInput::Witness(name.into())));
            assert!(bad_input(r), "witness {name:?} accepted");
        }
        assert_concludes(RuleKind::EI, &["∃x Fx"], Some(RuleInput::Witness("a2".into())), "Fa2");

        // UI terms, including ones whose variant disagrees with the name
        for term in [Term::constant("Q"), Term::constant(""), Term::constant("ab"), Term::constant("x"), Term::var("a")] {
            let r = conclude(RuleKind::UI, &["∀x Fx"], Some(RuleInput::Term(term.clone())));
            assert!(bad_input(r), "term {term:?} accepted");
        }

        // Bound names for UG and EG
        for variable in ["xy", "a", "X", ""] {
            let ug = conclude(
                RuleKind::UG,
                &["Fy"],
                Some(RuleInput::Generalize {
                    term: Term::var("y"),
                    variable: variable.into(),
                }),
            );
            assert!(bad_input(ug), "UG bound {variable:?} accepted");
            let eg = conclude(
                RuleKind::EG,
                &["Fa"],
                Some(RuleInput::Generalize {
                    term: Term::constant("a"),
                    variable: variable.into(),
                }),
            );
            assert!(bad_input(eg), "EG bound {variable:?} accepted");
        }
        let eg = conclude(
            RuleKind::EG,
            &["Fa"],
            Some(RuleInput::Generalize {
                term: Term::constant("a"),
                variable: "x1".into(),
            }),
        );
        assert_eq!(eg.unwrap(), f("∃x1 Fx1"));
    }

    #[test]
    fn test_ui_rejects_captured_variable() {
        let captured = conclude(RuleKind::UI, &["∀x∃y Rxy"], Some(RuleInput::Term(Term::var("y"))));
        assert!(matches!(captured, Err(RuleError::BadInput { rule: "UI", .. })));

        let input = Some(RuleInput::Term(Term::var("z")));
        assert_concludes(RuleKind::UI, &["∀x∃y Rxy"], input, "∃y Rzy");
    }

    #[test]
    fn test_ee_plan() {
        let premises = [Premise::line(f("∃x Fx"), 1), Premise::goal(f("P"))];
        let input = RuleInput::Witness("a".into());
        let out = RuleKind::EE.apply(&premises, Some(&input)).unwrap();
        let plan = out.plan().unwrap();
        assert_eq!(plan.kind, SubproofKind::EE);
        assert_eq!(plan.assumption, Some(f("Fa")));
        assert_eq!(plan.conclusion, f("P"));
        assert_eq!(plan.witness.as_deref(), Some("a"));

        let premises = [Premise::line(f("∃x Fx"), 1), Premise::goal(f("Ga"))];
        assert!(RuleKind::EE.apply(&premises, Some(&input)).is_err());
    }

    #[test]
    fn test_fresh_constant() {
        let a = f("Fab");
        let b = f("Gc");
        assert_eq!(fresh_constant(&[&a, &b]).as_deref(), Some("d"));
    }
}
