//! Pretty printer for formulas
//!
//! Binary nodes are always parenthesized; the outermost pair is then
//! dropped when it encloses the whole text. The result re-parses to a
//! structurally equal formula.

use crate::ast::Formula;
use std::fmt;

/// Render a formula as canonical text.
pub fn print(formula: &Formula) -> String {
    let mut out = String::new();
    write_formula(&mut out, formula);
    strip_outer_parens(&out).to_string()
}

fn write_formula(out: &mut String, formula: &Formula) {
    match formula {
        Formula::Atom(name) => out.push_str(name),
        Formula::Pred(name, args) => {
            out.push_str(name);
            for arg in args {
                out.push_str(arg.name());
            }
        }
        Formula::Not(inner) => {
            out.push('~');
            write_formula(out, inner);
        }
        Formula::Modal(op, inner) => {
            out.push_str(op.symbol());
            write_formula(out, inner);
        }
        Formula::Quant(kind, var, body) => {
            out.push_str(kind.symbol());
            out.push_str(var);
            if !matches!(**body, Formula::Binary(..)) {
                out.push(' ');
            }
            write_formula(out, body);
        }
        Formula::Binary(op, left, right) => {
            out.push('(');
            write_formula(out, left);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_formula(out, right);
            out.push(')');
        }
    }
}

/// Drop one pair of parentheses that wraps the entire string.
///
/// The pair is only removed when the depth never returns to zero before the
/// final character, so `(P) ∧ (Q)` is left alone.
pub fn strip_outer_parens(text: &str) -> &str {
    if !(text.starts_with('(') && text.ends_with(')')) {
        return text;
    }
    let last = text.len() - 1;
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != last {
                    return text;
                }
            }
            _ => {}
        }
    }
    &text[1..last]
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print(self))
    }
}
