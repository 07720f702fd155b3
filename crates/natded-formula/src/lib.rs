//! natded-formula - formulas for natural-deduction exercises
//!
//! Tokenizes, parses and prints propositional, modal and first-order
//! formulas, and compares them structurally.
//!
//! # Precedence
//!
//! From tightest to loosest: `□ ◊` and `~` (prefix), `∧` (left), `∨` (left),
//! `→` (right), `↔` (right). Quantifiers `∀x`, `∃x` are prefix operators
//! binding like `~`.
//!
//! # Example
//!
//! ```
//! use natded_formula::{equal, parse, print};
//!
//! let a = parse("P → Q → R").unwrap();
//! let b = parse("P → (Q → R)").unwrap();
//! assert!(equal(&a, &b));
//! assert_eq!(print(&a), "P → (Q → R)");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pretty;

pub use ast::{equal, is_variable_name, Assoc, BinOp, Formula, ModalOp, Quantifier, Term};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_term, Parser};
pub use pretty::print;
