//! Error types for sheetcalc-core

use crate::Position;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors that abort a sheet operation
///
/// Evaluation failures are not represented here; they are values
/// ([`CellError`](crate::CellError)) stored in formula caches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Coordinate outside the sheet bounds
    #[error("Invalid cell position (row {}, col {})", .0.row, .0.col)]
    InvalidPosition(Position),

    /// Formula text failed to parse
    #[error("Formula syntax error: {0}")]
    FormulaSyntax(String),

    /// Installing the formula would make a cell depend on itself
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Position),
}
