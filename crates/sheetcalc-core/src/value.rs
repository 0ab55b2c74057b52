//! Cell value types

use std::fmt;

/// The value a cell evaluates to
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Numeric value (formula results)
    Number(f64),

    /// Text value (literal cells; empty for empty cells)
    Text(String),

    /// Evaluation error
    Error(CellError),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

impl From<Result<f64, CellError>> for CellValue {
    fn from(result: Result<f64, CellError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

/// Formula evaluation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #REF! - Reference to a position outside the sheet
    Ref,
    /// #VALUE! - Referenced text is not a number
    Value,
    /// #DIV/0! - Division by zero or other non-finite arithmetic
    Div0,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Ref => "#REF!",
            CellError::Value => "#VALUE!",
            CellError::Div0 => "#DIV/0!",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for CellError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(0.5).to_string(), "0.5");
        assert_eq!(CellValue::text("abc").to_string(), "abc");
        assert_eq!(CellValue::Error(CellError::Value).to_string(), "#VALUE!");
    }

    #[test]
    fn test_cell_error_display() {
        assert_eq!(CellError::Ref.to_string(), "#REF!");
        assert_eq!(CellError::Value.to_string(), "#VALUE!");
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
    }

    #[test]
    fn test_from_result() {
        assert_eq!(CellValue::from(Ok(2.0)), CellValue::Number(2.0));
        assert_eq!(
            CellValue::from(Err(CellError::Ref)),
            CellValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_default_is_empty_text() {
        assert_eq!(CellValue::default(), CellValue::text(""));
    }
}
