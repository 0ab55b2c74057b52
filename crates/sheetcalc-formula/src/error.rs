//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while parsing a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed numeric literal
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Expression nests operators or parentheses too deeply
    #[error("Formula nested deeper than {0} levels")]
    TooDeep(usize),
}
