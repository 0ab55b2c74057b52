//! # sheetcalc
//!
//! A spreadsheet computation engine: a sparse grid of cells holding text or
//! formulas, with lazy evaluation, cached results, transitive invalidation
//! and rejection of circular references.
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(Position::parse("A1"), "2").unwrap();
//! sheet.set_cell(Position::parse("B1"), "=A1*21").unwrap();
//!
//! let value = sheet.value(Position::parse("B1")).unwrap();
//! assert_eq!(value, Some(CellValue::Number(42.0)));
//!
//! // A formula may not read its own result
//! let err = sheet.set_cell(Position::parse("A1"), "=B1").unwrap_err();
//! assert!(matches!(err, Error::CircularDependency(_)));
//! ```

pub mod cell;
mod graph;
pub mod prelude;
mod print;
pub mod sheet;

pub use cell::{Cell, CellContent, FormulaCell, ESCAPE_SIGN, FORMULA_SIGN};
pub use sheet::Sheet;

// Re-export core types
pub use sheetcalc_core::{
    CellError, CellValue, Error, Position, Result, Size, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use sheetcalc_formula::{parse_formula, CellLookup, Formula, FormulaError};
