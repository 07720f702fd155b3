//! Rule application engine
//!
//! [`ProofEngine`] owns the ledger, the scope stack and any pending rule
//! application. Every command either commits completely and returns the
//! resulting events, or returns an error and leaves the state unchanged.

use crate::command::{Command, PremiseRef};
use crate::config::{EngineConfig, LogicSystem};
use crate::error::{ProofError, ProofResult};
use crate::event::ProofEvent;
use crate::ledger::{Ledger, NewLine};
use crate::line::{BlockId, LineId, LineKind, ProofLine};
use crate::problem::Problem;
use crate::scope::{ScopeStack, SubGoal};
use natded_formula::{equal, parse, Formula, Term};
use natded_rules::{
    InputKind, InputRequest, Origin, Premise, RuleError, RuleInput, RuleKind, RuleOutput, Source,
    SubproofKind, SubproofPlan,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A rule application waiting for [`ProofEngine::provide_input`].
#[derive(Clone, Debug)]
struct PendingApplication {
    rule: RuleKind,
    premises: Vec<Premise>,
    request: InputRequest,
}

/// Interactive natural-deduction proof.
#[derive(Clone, Debug)]
pub struct ProofEngine {
    config: EngineConfig,
    ledger: Ledger,
    stack: ScopeStack,
    pending: Option<PendingApplication>,
    /// Names introduced by EI and EE
    witnesses: BTreeSet<String>,
}

impl ProofEngine {
    /// Start a proof with the default configuration for the problem's
    /// logic system.
    pub fn from_problem(problem: &Problem) -> ProofResult<Self> {
        Self::with_config(problem, EngineConfig::for_system(problem.system))
    }

    /// Start a proof. Premises become lines 1..n at the top level.
    pub fn with_config(problem: &Problem, config: EngineConfig) -> ProofResult<Self> {
        let (premises, goal) = problem.formulas()?;
        let mut engine = ProofEngine {
            config,
            ledger: Ledger::new(goal),
            stack: ScopeStack::new(),
            pending: None,
            witnesses: BTreeSet::new(),
        };
        for formula in premises {
            engine.ledger.append(NewLine {
                formula,
                justification: "Premise".to_string(),
                scope_level: 0,
                block: BlockId::ROOT,
                kind: LineKind::Premise,
                strict: false,
            })?;
        }
        debug!(
            premises = engine.ledger.len(),
            goal = %engine.ledger.goal(),
            system = %engine.config.system,
            "proof started"
        );
        Ok(engine)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Run a command, turning any error into an error feedback event.
    pub fn dispatch(&mut self, command: Command) -> Vec<ProofEvent> {
        let result = match command {
            Command::Parse { text } => self
                .parse_formula(&text)
                .map(|f| vec![ProofEvent::info(format!("parsed as {f}"))]),
            Command::StartSubproof {
                rule,
                formula,
                source,
                premises,
                input,
            } => self.start_subproof_with(&rule, &formula, source, &premises, input),
            Command::ApplyRule {
                rule,
                premises,
                input,
            } => self.apply_rule_with(&rule, &premises, input),
            Command::ProvideInput { input } => self.provide_input(input),
            Command::Discharge => self.discharge_subproof(),
            Command::AddLine {
                text,
                justification,
                scope,
            } => self.add_line(&text, justification, scope),
        };
        result.unwrap_or_else(|e| {
            warn!(kind = ?e.kind(), "rejected: {e}");
            vec![ProofEvent::error(e.to_string())]
        })
    }

    pub fn parse_formula(&self, text: &str) -> ProofResult<Formula> {
        Ok(parse(text)?)
    }

    pub fn apply_rule(&mut self, rule: &str, premises: &[PremiseRef]) -> ProofResult<Vec<ProofEvent>> {
        self.apply_rule_with(rule, premises, None)
    }

    /// Apply a rule to cited premises, optionally answering its input
    /// request up front.
    pub fn apply_rule_with(
        &mut self,
        rule: &str,
        premises: &[PremiseRef],
        input: Option<RuleInput>,
    ) -> ProofResult<Vec<ProofEvent>> {
        let rule = self.resolve_rule(rule)?;
        let premises = premises
            .iter()
            .map(|p| self.resolve_premise(rule, p))
            .collect::<ProofResult<Vec<_>>>()?;
        debug!(%rule, premises = premises.len(), "apply rule");
        self.run(rule, premises, input)
    }

    pub fn start_subproof(
        &mut self,
        rule: &str,
        formula: &str,
        source: Source,
    ) -> ProofResult<Vec<ProofEvent>> {
        self.start_subproof_with(rule, formula, source, &[], None)
    }

    /// Open a subproof on a dropped goal. `premises` are the proof-line
    /// premises that precede the goal slot (the existential for EE).
    pub fn start_subproof_with(
        &mut self,
        rule: &str,
        formula: &str,
        source: Source,
        premises: &[PremiseRef],
        input: Option<RuleInput>,
    ) -> ProofResult<Vec<ProofEvent>> {
        let rule = self.resolve_rule(rule)?;
        if !rule.is_subproof() {
            return Err(RuleError::mismatch(rule.name(), "this rule does not open a subproof").into());
        }
        let origin = match source {
            Source::Goal => Origin::Goal,
            Source::Workspace => Origin::Workspace,
            Source::ProofLine => {
                return Err(RuleError::Source {
                    rule: rule.name(),
                    placeholder: "goal",
                    allowed: "the goal or the workspace".to_string(),
                }
                .into())
            }
        };
        let mut resolved = premises
            .iter()
            .map(|p| self.resolve_premise(rule, p))
            .collect::<ProofResult<Vec<_>>>()?;
        resolved.push(Premise::new(self.parse_formula(formula)?, origin));
        debug!(%rule, goal = formula, "start subproof");
        self.run(rule, resolved, input)
    }

    /// Answer the pending input request.
    pub fn provide_input(&mut self, input: RuleInput) -> ProofResult<Vec<ProofEvent>> {
        let pending = self.pending.clone().ok_or(ProofError::NoPendingInput)?;
        if input_kind(&input) != pending.request.kind {
            let expected = match pending.request.kind {
                InputKind::Side => "left or right",
                InputKind::Term => "a term",
                InputKind::Witness => "a new name",
                InputKind::Generalize => "a term and a variable",
            };
            return Err(RuleError::bad_input(
                pending.rule.name(),
                format!("expected {expected}, got {input}"),
            )
            .into());
        }
        debug!(rule = %pending.rule, %input, "input provided");
        self.run(pending.rule, pending.premises, Some(input))
    }

    /// Close the active subproof explicitly.
    pub fn discharge_subproof(&mut self) -> ProofResult<Vec<ProofEvent>> {
        let goal = self.stack.top().ok_or(ProofError::NoOpenSubproof)?;
        let met = self
            .ledger
            .in_block(goal.block)
            .any(|line| self.reaches(goal, line));
        if !met {
            let target = match goal.kind {
                SubproofKind::RAA => "a contradiction".to_string(),
                _ => goal.goal.to_string(),
            };
            return Err(ProofError::GoalNotMet {
                kind: goal.kind.name(),
                goal: target,
            });
        }
        let mut events = Vec::new();
        let id = self.close(&mut events)?;
        self.settle(id, &mut events)?;
        self.pending = None;
        Ok(events)
    }

    /// Add a line by hand at the active scope.
    pub fn add_line(
        &mut self,
        text: &str,
        justification: Option<String>,
        scope: Option<usize>,
    ) -> ProofResult<Vec<ProofEvent>> {
        if !self.config.allow_manual_lines {
            return Err(ProofError::ManualLinesDisabled);
        }
        let formula = self.parse_formula(text)?;
        let depth = self.stack.depth();
        if scope.is_some_and(|s| s != depth) {
            return Err(ProofError::scope(format!(
                "lines can only be added at the active scope level {depth}"
            )));
        }
        let mut events = Vec::new();
        let justification = justification.unwrap_or_else(|| "Manual".to_string());
        let id = self.append(formula, justification, LineKind::Manual, &mut events)?;
        self.settle(id, &mut events)?;
        self.pending = None;
        Ok(events)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn system(&self) -> LogicSystem {
        self.config.system
    }

    pub fn lines(&self) -> &[ProofLine] {
        self.ledger.lines()
    }

    pub fn line(&self, number: u32) -> Option<&ProofLine> {
        self.ledger.by_number(number)
    }

    pub fn goal(&self) -> &Formula {
        self.ledger.goal()
    }

    pub fn is_goal_reached(&self) -> bool {
        self.ledger.is_goal_reached()
    }

    /// No open subproofs and the goal is proven at the top level.
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty() && self.ledger.is_goal_reached()
    }

    pub fn scope_level(&self) -> usize {
        self.stack.depth()
    }

    pub fn active_subgoal(&self) -> Option<&SubGoal> {
        self.stack.top()
    }

    pub fn subgoals(&self) -> &[SubGoal] {
        self.stack.open()
    }

    pub fn pending_input(&self) -> Option<&InputRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    pub fn available_rules(&self) -> Vec<RuleKind> {
        self.config.system.rules().collect()
    }

    // ========================================================================
    // Rule application
    // ========================================================================

    fn resolve_rule(&self, name: &str) -> ProofResult<RuleKind> {
        let rule = RuleKind::lookup(name).ok_or_else(|| ProofError::UnknownRule(name.to_string()))?;
        if !self.config.system.allows(rule) {
            return Err(ProofError::RuleUnavailable {
                rule: rule.name(),
                system: self.config.system,
            });
        }
        Ok(rule)
    }

    fn resolve_premise(&self, rule: RuleKind, premise: &PremiseRef) -> ProofResult<Premise> {
        match premise {
            PremiseRef::Formula(text) => Ok(Premise::workspace(self.parse_formula(text)?)),
            PremiseRef::Line(n) => {
                let line = self.ledger.by_number(*n).ok_or(ProofError::UnknownLine(*n))?;
                self.check_citable(rule, line)?;
                Ok(Premise::line(line.formula.clone(), *n))
            }
        }
    }

    fn check_citable(&self, rule: RuleKind, line: &ProofLine) -> ProofResult<()> {
        let label = line.label();
        if !self.stack.is_open(line.block) {
            return Err(ProofError::scope(format!(
                "line {label} is inside a closed subproof and can no longer be cited"
            )));
        }
        let citable = self.stack.is_citable(line.block);
        if rule == RuleKind::BoxImport {
            if !self.stack.in_strict() {
                return Err(ProofError::scope(
                    "□Imp can only be used directly inside a strict subproof",
                ));
            }
            if citable {
                return Err(ProofError::scope(format!(
                    "line {label} is already inside the strict subproof; use □E instead"
                )));
            }
        } else if !citable {
            return Err(ProofError::scope(format!(
                "line {label} lies outside the strict subproof; import it with □Imp"
            )));
        }
        Ok(())
    }

    fn run(
        &mut self,
        rule: RuleKind,
        premises: Vec<Premise>,
        input: Option<RuleInput>,
    ) -> ProofResult<Vec<ProofEvent>> {
        if let Some(input) = &input {
            self.check_restrictions(rule, input)?;
        }
        match rule.apply(&premises, input.as_ref()) {
            Err(RuleError::InputRequired(request)) => {
                let request = self.enrich(request);
                let mut events = Vec::new();
                if let Some(previous) = self.pending.take() {
                    events.push(ProofEvent::warning(format!(
                        "the pending {} step was abandoned",
                        previous.rule
                    )));
                }
                debug!(%rule, kind = ?request.kind, "rule needs input");
                events.push(ProofEvent::InputRequired {
                    request: request.clone(),
                });
                self.pending = Some(PendingApplication {
                    rule,
                    premises,
                    request,
                });
                Ok(events)
            }
            Err(e) => Err(e.into()),
            Ok(RuleOutput::Conclusion(formula)) => {
                let events = self.conclude(rule, &premises, input.as_ref(), formula)?;
                self.pending = None;
                Ok(events)
            }
            Ok(RuleOutput::OpenSubproof(plan)) => {
                let events = self.open_subproof(&premises, plan)?;
                self.pending = None;
                Ok(events)
            }
        }
    }

    /// Conditions that depend on the whole proof rather than on the premises.
    fn check_restrictions(&self, rule: RuleKind, input: &RuleInput) -> ProofResult<()> {
        match (rule, input) {
            (RuleKind::EI | RuleKind::EE, RuleInput::Witness(name)) => {
                if self.name_in_use(name) {
                    return Err(ProofError::restriction(
                        rule.name(),
                        format!("{name} already occurs in the proof; choose a new name"),
                    ));
                }
            }
            (RuleKind::UG, RuleInput::Generalize { term: Term::Var(v), .. }) => {
                let in_premise = self
                    .ledger
                    .lines()
                    .iter()
                    .any(|l| l.kind == LineKind::Premise && l.formula.occurs_free(v));
                if in_premise {
                    return Err(ProofError::restriction(
                        "UG",
                        format!("{v} occurs free in a premise"),
                    ));
                }
                if self.stack.open_assumptions().any(|a| a.occurs_free(v)) {
                    return Err(ProofError::restriction(
                        "UG",
                        format!("{v} occurs free in an open assumption"),
                    ));
                }
                if self.witnesses.contains(v) {
                    return Err(ProofError::restriction(
                        "UG",
                        format!("{v} was introduced as an existential witness"),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn name_in_use(&self, name: &str) -> bool {
        self.witnesses.contains(name) || self.ledger.mentions(name)
    }

    /// Add suggestions that need the whole proof to compute.
    fn enrich(&self, mut request: InputRequest) -> InputRequest {
        match request.kind {
            InputKind::Term => {
                let terms: Vec<Term> = self
                    .accessible()
                    .flat_map(|l| l.formula.terms())
                    .filter(|t| !t.is_var())
                    .collect();
                for term in terms {
                    let input = RuleInput::Term(term.clone());
                    if !request.choices.iter().any(|c| c.input == input) {
                        request = request.with_choice(input, term.to_string());
                    }
                }
                if request.choices.is_empty() {
                    if let Some(name) = self.fresh_name() {
                        request = request.with_choice(RuleInput::Term(Term::constant(name.clone())), name);
                    }
                }
                request
            }
            InputKind::Witness => {
                request.choices.clear();
                match self.fresh_name() {
                    Some(name) => request.with_choice(RuleInput::Witness(name.clone()), name),
                    None => request,
                }
            }
            InputKind::Side | InputKind::Generalize => request,
        }
    }

    fn fresh_name(&self) -> Option<String> {
        ('a'..='t')
            .map(String::from)
            .find(|name| !self.name_in_use(name))
    }

    fn conclude(
        &mut self,
        rule: RuleKind,
        premises: &[Premise],
        input: Option<&RuleInput>,
        formula: Formula,
    ) -> ProofResult<Vec<ProofEvent>> {
        let kind = if rule == RuleKind::BoxImport {
            LineKind::Imported
        } else {
            LineKind::Derived
        };
        let mut events = Vec::new();
        let id = self.append(formula, justify(rule, premises, input), kind, &mut events)?;
        if let (RuleKind::EI, Some(RuleInput::Witness(name))) = (rule, input) {
            self.witnesses.insert(name.clone());
        }
        self.settle(id, &mut events)?;
        Ok(events)
    }

    // ========================================================================
    // Subproofs
    // ========================================================================

    fn open_subproof(
        &mut self,
        premises: &[Premise],
        plan: SubproofPlan,
    ) -> ProofResult<Vec<ProofEvent>> {
        let active = self.stack.active_block();
        if let Some(existing) = self.ledger.find_proven(active, &plan.conclusion) {
            return Err(ProofError::Duplicate {
                formula: plan.conclusion.to_string(),
                existing: existing.number.unwrap_or_default(),
            });
        }

        let mut events = Vec::new();
        let level = self.stack.depth();
        let show = self.ledger.append(NewLine {
            formula: plan.show.clone(),
            justification: "Show".to_string(),
            scope_level: level,
            block: active,
            kind: LineKind::Show,
            strict: self.stack.in_strict(),
        })?;
        self.push_line_event(show.id, &mut events);

        let block = self.stack.allocate_block();
        let assumption_line = match &plan.assumption {
            Some(assumption) => {
                let appended = self.ledger.append(NewLine {
                    formula: assumption.clone(),
                    justification: assumption_justification(plan.kind, premises),
                    scope_level: level + 1,
                    block,
                    kind: LineKind::Assumption,
                    strict: false,
                })?;
                self.push_line_event(appended.id, &mut events);
                Some(appended.id)
            }
            None => None,
        };

        let subgoal = SubGoal {
            kind: plan.kind,
            scope_level: level + 1,
            assumption: plan.assumption,
            goal: plan.goal,
            conclusion: plan.conclusion,
            is_strict: plan.kind.is_strict(),
            block,
            show_line: show.id,
            assumption_line,
            witness: plan.witness,
        };
        debug!(kind = %subgoal.kind, level = subgoal.scope_level, goal = %subgoal.goal, "subproof opened");
        if let Some(witness) = &subgoal.witness {
            self.witnesses.insert(witness.clone());
        }
        self.stack.push(subgoal.clone());
        events.push(ProofEvent::SubgoalChanged {
            subgoal: Some(subgoal),
        });

        // An RAA assumption may already contradict an accessible line
        if let Some(id) = assumption_line {
            self.settle(id, &mut events)?;
        }
        Ok(events)
    }

    /// Whether `line` completes the subproof `goal`.
    fn reaches(&self, goal: &SubGoal, line: &ProofLine) -> bool {
        match goal.kind {
            SubproofKind::RAA => self.contradiction_for(line).is_some(),
            SubproofKind::CP | SubproofKind::Strict | SubproofKind::EE => {
                line.is_proven() && equal(&line.formula, &goal.goal)
            }
        }
    }

    /// First accessible line, in line order, that contradicts `line`.
    fn contradiction_for(&self, line: &ProofLine) -> Option<&ProofLine> {
        self.accessible()
            .find(|other| other.id != line.id && other.formula.contradicts(&line.formula))
    }

    /// Lines citable from the active scope without importation.
    fn accessible(&self) -> impl Iterator<Item = &ProofLine> {
        self.ledger
            .lines()
            .iter()
            .filter(move |l| !l.is_show_line() && self.stack.is_citable(l.block))
    }

    /// Auto-discharge after `id` was appended, cascading outwards.
    fn settle(&mut self, mut id: LineId, events: &mut Vec<ProofEvent>) -> ProofResult<()> {
        if !self.config.auto_discharge {
            return Ok(());
        }
        while let Some(goal) = self.stack.top() {
            let Some(line) = self.ledger.get(id) else {
                break;
            };
            if line.block != goal.block || !self.reaches(goal, line) {
                break;
            }
            id = self.close(events)?;
        }
        Ok(())
    }

    /// Pop the active subproof and append its conclusion to the parent.
    fn close(&mut self, events: &mut Vec<ProofEvent>) -> ProofResult<LineId> {
        let goal = self.stack.pop().ok_or(ProofError::NoOpenSubproof)?;
        let justification = match self.ledger.number_range(goal.block) {
            Some((first, last)) if first != last => format!("{} {first}-{last}", goal.kind),
            Some((first, _)) => format!("{} {first}", goal.kind),
            None => goal.kind.to_string(),
        };
        debug!(kind = %goal.kind, conclusion = %goal.conclusion, %justification, "discharge");
        let mark = events.len();
        events.push(ProofEvent::SubgoalChanged {
            subgoal: self.stack.top().cloned(),
        });
        match self.append(goal.conclusion.clone(), justification, LineKind::Discharged, events) {
            Ok(id) => Ok(id),
            Err(e) => {
                events.truncate(mark);
                self.stack.push(goal);
                Err(e)
            }
        }
    }

    // ========================================================================
    // Ledger
    // ========================================================================

    fn append(
        &mut self,
        formula: Formula,
        justification: String,
        kind: LineKind,
        events: &mut Vec<ProofEvent>,
    ) -> ProofResult<LineId> {
        let appended = self.ledger.append(NewLine {
            formula,
            justification,
            scope_level: self.stack.depth(),
            block: self.stack.active_block(),
            kind,
            strict: self.stack.in_strict(),
        })?;
        self.push_line_event(appended.id, events);
        if appended.reached_goal {
            debug!("goal reached");
            events.push(ProofEvent::GoalReached);
        }
        Ok(appended.id)
    }

    fn push_line_event(&self, id: LineId, events: &mut Vec<ProofEvent>) {
        if let Some(line) = self.ledger.get(id) {
            events.push(ProofEvent::LineAdded { line: line.clone() });
        }
    }
}

fn input_kind(input: &RuleInput) -> InputKind {
    match input {
        RuleInput::Side(_) => InputKind::Side,
        RuleInput::Term(_) => InputKind::Term,
        RuleInput::Witness(_) => InputKind::Witness,
        RuleInput::Generalize { .. } => InputKind::Generalize,
    }
}

/// `"<rule> <cited lines>"`, plus the chosen term or name where there is one.
fn justify(rule: RuleKind, premises: &[Premise], input: Option<&RuleInput>) -> String {
    let cited: Vec<String> = premises
        .iter()
        .filter_map(|p| p.origin.line())
        .map(|n| n.to_string())
        .collect();
    let mut text = rule.name().to_string();
    if !cited.is_empty() {
        text.push(' ');
        text.push_str(&cited.join(", "));
    }
    match input {
        Some(RuleInput::Side(_)) | None => {}
        Some(other) => text.push_str(&format!(" ({other})")),
    }
    text
}

fn assumption_justification(kind: SubproofKind, premises: &[Premise]) -> String {
    match premises.first().and_then(|p| p.origin.line()) {
        Some(n) if kind == SubproofKind::EE => format!("Assumption (EE {n})"),
        _ => format!("Assumption ({kind})"),
    }
}
