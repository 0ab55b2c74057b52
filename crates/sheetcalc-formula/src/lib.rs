//! # sheetcalc-formula
//!
//! Formula parser and evaluator for sheetcalc.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Canonical formula printing (AST → text)
//! - Formula evaluation against a cell lookup (AST → number or error)
//! - Referenced-cell extraction for dependency tracking
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::{CellError, Position};
//! use sheetcalc_formula::parse_formula;
//!
//! let formula = parse_formula("( A1 + 2 ) * 3").unwrap();
//! assert_eq!(formula.expression(), "(A1+2)*3");
//! assert_eq!(formula.referenced_cells(), &[Position::new(0, 0)]);
//!
//! let lookup = |_pos: Position| -> Result<f64, CellError> { Ok(4.0) };
//! assert_eq!(formula.evaluate(&lookup), Ok(18.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, CellLookup};
pub use formula::{parse_formula, Formula};
pub use parser::{parse_expression, MAX_DEPTH};
