//! Formula representation.
//!
//! Formulas are immutable trees. Children sit behind [`Arc`] so that
//! substitution can hand back untouched subtrees without copying them, and
//! so that formulas can be moved freely between threads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A term inside a predicate.
///
/// Lowercase letters `u` through `z` name variables, every other lowercase
/// letter names a constant. Trailing digits are allowed (`x1`, `a2`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Term {
    Var(String),
    Const(String),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Term::Const(name.into())
    }

    /// Classify a term name by its leading letter.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if is_variable_name(&name) {
            Term::Var(name)
        } else {
            Term::Const(name)
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Term::Var(n) | Term::Const(n) => n,
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }
}

/// Whether a lowercase name denotes a variable rather than a constant.
pub fn is_variable_name(name: &str) -> bool {
    matches!(name.chars().next(), Some('u'..='z'))
}

impl From<String> for Term {
    fn from(name: String) -> Self {
        Term::named(name)
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        match term {
            Term::Var(n) | Term::Const(n) => n,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary connectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    And,
    Or,
    Implies,
    Iff,
}

/// Operator associativity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

impl BinOp {
    /// Binding strength; larger binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::And => 4,
            BinOp::Or => 3,
            BinOp::Implies => 2,
            BinOp::Iff => 1,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            BinOp::And | BinOp::Or => Assoc::Left,
            BinOp::Implies | BinOp::Iff => Assoc::Right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::And => "∧",
            BinOp::Or => "∨",
            BinOp::Implies => "→",
            BinOp::Iff => "↔",
        }
    }
}

/// Modal prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalOp {
    Necessarily,
    Possibly,
}

impl ModalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ModalOp::Necessarily => "□",
            ModalOp::Possibly => "◊",
        }
    }
}

/// Quantifier kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    Forall,
    Exists,
}

impl Quantifier {
    pub fn symbol(self) -> &'static str {
        match self {
            Quantifier::Forall => "∀",
            Quantifier::Exists => "∃",
        }
    }
}

/// A propositional, modal or first-order formula.
///
/// Equality is structural: two formulas are equal when they have the same
/// shape and equal children in order, regardless of how they were written.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// Sentence letter
    Atom(String),
    /// ~A
    Not(Arc<Formula>),
    /// □A or ◊A
    Modal(ModalOp, Arc<Formula>),
    /// A ∧ B, A ∨ B, A → B, A ↔ B
    Binary(BinOp, Arc<Formula>, Arc<Formula>),
    /// ∀x A or ∃x A
    Quant(Quantifier, String, Arc<Formula>),
    /// Fx, Gab
    Pred(String, Vec<Term>),
}

impl Formula {
    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atom(name.into())
    }

    pub fn not(inner: Formula) -> Self {
        Formula::Not(Arc::new(inner))
    }

    pub fn boxed(inner: Formula) -> Self {
        Formula::Modal(ModalOp::Necessarily, Arc::new(inner))
    }

    pub fn diamond(inner: Formula) -> Self {
        Formula::Modal(ModalOp::Possibly, Arc::new(inner))
    }

    pub fn binary(op: BinOp, left: Formula, right: Formula) -> Self {
        Formula::Binary(op, Arc::new(left), Arc::new(right))
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::binary(BinOp::And, left, right)
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::binary(BinOp::Or, left, right)
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Formula::binary(BinOp::Implies, left, right)
    }

    pub fn iff(left: Formula, right: Formula) -> Self {
        Formula::binary(BinOp::Iff, left, right)
    }

    pub fn forall(var: impl Into<String>, body: Formula) -> Self {
        Formula::Quant(Quantifier::Forall, var.into(), Arc::new(body))
    }

    pub fn exists(var: impl Into<String>, body: Formula) -> Self {
        Formula::Quant(Quantifier::Exists, var.into(), Arc::new(body))
    }

    pub fn pred(name: impl Into<String>, args: Vec<Term>) -> Self {
        Formula::Pred(name.into(), args)
    }

    // Shape accessors

    pub fn as_negation(&self) -> Option<&Formula> {
        match self {
            Formula::Not(inner) => Some(&**inner),
            _ => None,
        }
    }

    pub fn as_binary(&self, op: BinOp) -> Option<(&Formula, &Formula)> {
        match self {
            Formula::Binary(o, l, r) if *o == op => Some((&**l, &**r)),
            _ => None,
        }
    }

    pub fn as_conditional(&self) -> Option<(&Formula, &Formula)> {
        self.as_binary(BinOp::Implies)
    }

    pub fn as_modal(&self, op: ModalOp) -> Option<&Formula> {
        match self {
            Formula::Modal(o, inner) if *o == op => Some(&**inner),
            _ => None,
        }
    }

    pub fn as_quantified(&self, kind: Quantifier) -> Option<(&str, &Formula)> {
        match self {
            Formula::Quant(k, var, body) if *k == kind => Some((var.as_str(), &**body)),
            _ => None,
        }
    }

    /// True when one of the two formulas is exactly `~` the other.
    pub fn contradicts(&self, other: &Formula) -> bool {
        self.as_negation() == Some(other) || other.as_negation() == Some(self)
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Formula::Atom(_) | Formula::Pred(_, _) => 1,
            Formula::Not(inner) | Formula::Modal(_, inner) | Formula::Quant(_, _, inner) => {
                1 + inner.size()
            }
            Formula::Binary(_, l, r) => 1 + l.size() + r.size(),
        }
    }

    // First-order helpers

    /// Variables occurring free.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_free_vars(&mut Vec::new(), &mut out);
        out
    }

    fn collect_free_vars(&self, bound: &mut Vec<String>, out: &mut BTreeSet<String>) {
        match self {
            Formula::Atom(_) => {}
            Formula::Pred(_, args) => {
                for arg in args {
                    if let Term::Var(v) = arg {
                        if !bound.contains(v) {
                            out.insert(v.clone());
                        }
                    }
                }
            }
            Formula::Not(inner) | Formula::Modal(_, inner) => inner.collect_free_vars(bound, out),
            Formula::Binary(_, l, r) => {
                l.collect_free_vars(bound, out);
                r.collect_free_vars(bound, out);
            }
            Formula::Quant(_, var, body) => {
                bound.push(var.clone());
                body.collect_free_vars(bound, out);
                bound.pop();
            }
        }
    }

    pub fn occurs_free(&self, var: &str) -> bool {
        self.free_vars().contains(var)
    }

    /// Every term appearing in a predicate, in first-occurrence order.
    pub fn terms(&self) -> Vec<Term> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms(&self, out: &mut Vec<Term>) {
        match self {
            Formula::Atom(_) => {}
            Formula::Pred(_, args) => {
                for arg in args {
                    if !out.contains(arg) {
                        out.push(arg.clone());
                    }
                }
            }
            Formula::Not(inner) | Formula::Modal(_, inner) | Formula::Quant(_, _, inner) => {
                inner.collect_terms(out)
            }
            Formula::Binary(_, l, r) => {
                l.collect_terms(out);
                r.collect_terms(out);
            }
        }
    }

    /// Whether `name` is used as a term or a bound variable anywhere.
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Formula::Atom(_) => false,
            Formula::Pred(_, args) => args.iter().any(|t| t.name() == name),
            Formula::Not(inner) | Formula::Modal(_, inner) => inner.mentions(name),
            Formula::Binary(_, l, r) => l.mentions(name) || r.mentions(name),
            Formula::Quant(_, var, body) => var == name || body.mentions(name),
        }
    }

    /// Replace free occurrences of the variable `var` by `term`.
    ///
    /// Quantifiers that rebind `var` are left untouched.
    pub fn substitute(&self, var: &str, term: &Term) -> Formula {
        self.replace_free(&Term::var(var), term)
    }

    /// Replace free occurrences of `from` by `to`.
    ///
    /// A constant is never bound, so every occurrence of a constant is free.
    pub fn replace_free(&self, from: &Term, to: &Term) -> Formula {
        match self {
            Formula::Atom(_) => self.clone(),
            Formula::Pred(name, args) => Formula::Pred(
                name.clone(),
                args.iter()
                    .map(|a| if a == from { to.clone() } else { a.clone() })
                    .collect(),
            ),
            Formula::Not(inner) => Formula::Not(replace_shared(inner, from, to)),
            Formula::Modal(op, inner) => Formula::Modal(*op, replace_shared(inner, from, to)),
            Formula::Binary(op, l, r) => Formula::Binary(
                *op,
                replace_shared(l, from, to),
                replace_shared(r, from, to),
            ),
            Formula::Quant(kind, var, body) => {
                if matches!(from, Term::Var(v) if v == var) {
                    self.clone()
                } else {
                    Formula::Quant(*kind, var.clone(), replace_shared(body, from, to))
                }
            }
        }
    }

    /// Whether substituting `term` for the free variable `var` would place
    /// it under a quantifier that binds the term's name.
    pub fn captures(&self, var: &str, term: &Term) -> bool {
        match term {
            Term::Var(name) if name != var => self.captured_under(var, name, false),
            _ => false,
        }
    }

    fn captured_under(&self, var: &str, name: &str, shadowed: bool) -> bool {
        match self {
            Formula::Atom(_) => false,
            Formula::Pred(_, args) => {
                shadowed && args.iter().any(|t| matches!(t, Term::Var(v) if v == var))
            }
            Formula::Not(inner) | Formula::Modal(_, inner) => {
                inner.captured_under(var, name, shadowed)
            }
            Formula::Binary(_, l, r) => {
                l.captured_under(var, name, shadowed) || r.captured_under(var, name, shadowed)
            }
            // `var` rebound below: nothing there is substituted
            Formula::Quant(_, bound, _) if bound == var => false,
            Formula::Quant(_, bound, body) => body.captured_under(var, name, shadowed || bound == name),
        }
    }

    fn contains_free(&self, term: &Term) -> bool {
        match term {
            Term::Var(v) => self.occurs_free(v),
            Term::Const(c) => self.terms().iter().any(|t| matches!(t, Term::Const(n) if n == c)),
        }
    }
}

/// Substitute inside a shared child, reusing the same allocation when the
/// child has nothing to replace.
fn replace_shared(node: &Arc<Formula>, from: &Term, to: &Term) -> Arc<Formula> {
    if node.contains_free(from) {
        Arc::new(node.replace_free(from, to))
    } else {
        Arc::clone(node)
    }
}

/// Structural equality.
///
/// Mismatched variants short-circuit before any child is visited.
pub fn equal(a: &Formula, b: &Formula) -> bool {
    match (a, b) {
        (Formula::Atom(x), Formula::Atom(y)) => x == y,
        (Formula::Pred(n, xs), Formula::Pred(m, ys)) => n == m && xs == ys,
        (Formula::Not(x), Formula::Not(y)) => Arc::ptr_eq(x, y) || equal(x, y),
        (Formula::Modal(o, x), Formula::Modal(p, y)) => {
            o == p && (Arc::ptr_eq(x, y) || equal(x, y))
        }
        (Formula::Binary(o, xl, xr), Formula::Binary(p, yl, yr)) => {
            o == p && equal(xl, yl) && equal(xr, yr)
        }
        (Formula::Quant(k, v, x), Formula::Quant(q, w, y)) => k == q && v == w && equal(x, y),
        _ => false,
    }
}
