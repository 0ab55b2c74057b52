//! # sheetcalc-core
//!
//! Core data structures for the sheetcalc spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout sheetcalc:
//! - [`Position`] and [`Size`] - Cell addressing and printable extents
//! - [`CellValue`] and [`CellError`] - Values produced by cells
//! - [`Error`] - Structural errors raised by sheet edits
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::Position;
//!
//! let pos = Position::parse("B12");
//! assert_eq!(pos, Position::new(11, 1));
//! assert_eq!(pos.to_string(), "B12");
//!
//! assert!(!Position::parse("12B").is_valid());
//! ```

pub mod error;
pub mod position;
pub mod value;

pub use error::{Error, Result};
pub use position::{Position, Size};
pub use value::{CellError, CellValue};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: i32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: i32 = 16_384;
