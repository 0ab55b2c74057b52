//! Cell type and cell content
//!
//! A [`Cell`] owns its content and the coordinate-keyed edges of the
//! dependency graph. Edges are resolved back through the [`Sheet`](crate::Sheet)
//! on every traversal; the sheet keeps them symmetric.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use sheetcalc_core::{CellError, CellValue, Error, Position, Result};
use sheetcalc_formula::{parse_formula, CellLookup, Formula};

/// Leading character that marks formula text
pub const FORMULA_SIGN: char = '=';

/// Leading character that forces text interpretation; stripped from the value
pub const ESCAPE_SIGN: char = '\'';

/// Content of a cell
#[derive(Debug, Clone, Default)]
pub enum CellContent {
    /// No content; text and value are empty
    #[default]
    Empty,

    /// Literal text, kept verbatim (including a leading escape sign)
    Text(String),

    /// Parsed formula with its lazily computed result
    Formula(FormulaCell),
}

/// A formula and the cached result of evaluating it against its sheet
#[derive(Debug, Clone)]
pub struct FormulaCell {
    formula: Formula,
    cache: OnceCell<std::result::Result<f64, CellError>>,
}

impl FormulaCell {
    fn new(formula: Formula) -> Self {
        Self {
            formula,
            cache: OnceCell::new(),
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Cached result, if evaluated since the last invalidation
    pub fn cached(&self) -> Option<std::result::Result<f64, CellError>> {
        self.cache.get().copied()
    }
}

impl CellContent {
    /// Interpret raw cell text
    ///
    /// Empty text is [`CellContent::Empty`]; text starting with
    /// [`FORMULA_SIGN`] and longer than one character is parsed as a formula;
    /// anything else is literal text.
    pub fn parse(text: String) -> Result<Self> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }

        match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                let formula =
                    parse_formula(expression).map_err(|e| Error::FormulaSyntax(e.to_string()))?;
                Ok(CellContent::Formula(FormulaCell::new(formula)))
            }
            _ => Ok(CellContent::Text(text)),
        }
    }

    /// Text as the user would edit it
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(f) => format!("{}{}", FORMULA_SIGN, f.formula.expression()),
        }
    }

    /// Cells this content reads from
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Formula(f) => f.formula.referenced_cells(),
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }

    /// True when a formula result is currently cached
    pub fn has_cache(&self) -> bool {
        match self {
            CellContent::Formula(f) => f.cache.get().is_some(),
            _ => false,
        }
    }

    fn invalidate_cache(&mut self) {
        if let CellContent::Formula(f) = self {
            f.cache.take();
        }
    }
}

/// A single cell of a sheet
#[derive(Debug, Clone, Default)]
pub struct Cell {
    content: CellContent,
    /// Cells this cell reads from (forward edges)
    references: BTreeSet<Position>,
    /// Cells that read from this cell (backward edges)
    dependents: BTreeSet<Position>,
}

impl Cell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Text as entered (formulas in canonical form)
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Whether [`Cell::text`] would be non-empty
    pub fn has_text(&self) -> bool {
        !self.content.is_empty()
    }

    /// Compute the cell value against `ctx`
    ///
    /// Formula results are cached on first access and reused until
    /// invalidated. Evaluation errors become [`CellValue::Error`]. `ctx` must
    /// be the sheet owning this cell; the public accessor is
    /// [`Sheet::value`](crate::Sheet::value).
    pub(crate) fn evaluate(&self, ctx: &dyn CellLookup) -> CellValue {
        match &self.content {
            CellContent::Empty => CellValue::Text(String::new()),
            CellContent::Text(text) => {
                CellValue::text(text.strip_prefix(ESCAPE_SIGN).unwrap_or(text))
            }
            CellContent::Formula(f) => {
                let result = f.cache.get_or_init(|| {
                    log::trace!("evaluating ={}", f.formula.expression());
                    f.formula.evaluate(ctx)
                });
                CellValue::from(*result)
            }
        }
    }

    /// Formula whose result is not cached yet
    pub(crate) fn needs_evaluation(&self) -> bool {
        self.content.is_formula() && !self.content.has_cache()
    }

    /// Cells this cell's content reads from, sorted
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.references.iter().copied().collect()
    }

    /// Cells whose formulas read this cell, sorted
    pub fn dependents(&self) -> impl Iterator<Item = Position> + '_ {
        self.dependents.iter().copied()
    }

    /// Whether any other cell's formula reads this cell
    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    /// Drop this cell's cached result only; dependents are untouched
    pub fn invalidate_cache(&mut self) {
        self.content.invalidate_cache();
    }

    /// Replace the content, returning the previous forward edges
    ///
    /// Forward edges are reset to the new content's references; the caller
    /// must mirror the change in the backward edges of the cells involved.
    pub(crate) fn replace_content(&mut self, content: CellContent) -> BTreeSet<Position> {
        let references = content.referenced_cells().iter().copied().collect();
        self.content = content;
        std::mem::replace(&mut self.references, references)
    }

    pub(crate) fn add_dependent(&mut self, pos: Position) {
        self.dependents.insert(pos);
    }

    pub(crate) fn remove_dependent(&mut self, pos: Position) {
        self.dependents.remove(&pos);
    }

    pub(crate) fn forward_edges(&self) -> &BTreeSet<Position> {
        &self.references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn zero_lookup() -> impl Fn(Position) -> std::result::Result<f64, CellError> {
        |_| Ok(0.0)
    }

    fn cell_with(text: &str) -> Cell {
        let mut cell = Cell::new();
        cell.replace_content(CellContent::parse(text.to_string()).unwrap());
        cell
    }

    #[test]
    fn test_content_kinds() {
        assert!(CellContent::parse(String::new()).unwrap().is_empty());
        assert!(CellContent::parse("=1+2".into()).unwrap().is_formula());
        assert!(matches!(
            CellContent::parse("=".into()).unwrap(),
            CellContent::Text(t) if t == "="
        ));
        assert!(matches!(
            CellContent::parse("hello".into()).unwrap(),
            CellContent::Text(t) if t == "hello"
        ));
    }

    #[test]
    fn test_formula_syntax_error() {
        assert!(matches!(
            CellContent::parse("=1+".into()),
            Err(Error::FormulaSyntax(_))
        ));
    }

    #[test]
    fn test_escaped_text() {
        let cell = cell_with("'=1+2");
        assert_eq!(cell.text(), "'=1+2");
        assert_eq!(cell.evaluate(&zero_lookup()), CellValue::text("=1+2"));
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let cell = cell_with("= ( 1 + 2 ) ");
        assert_eq!(cell.text(), "=1+2");
        assert_eq!(cell.evaluate(&zero_lookup()), CellValue::Number(3.0));
    }

    #[test]
    fn test_cache_populated_and_invalidated() {
        let mut cell = cell_with("=A1+1");
        assert!(!cell.content().has_cache());

        assert_eq!(cell.evaluate(&zero_lookup()), CellValue::Number(1.0));
        assert!(cell.content().has_cache());

        // Cached result is reused even if the lookup would now differ
        let five = |_: Position| -> std::result::Result<f64, CellError> { Ok(5.0) };
        assert_eq!(cell.evaluate(&five), CellValue::Number(1.0));

        cell.invalidate_cache();
        assert!(!cell.content().has_cache());
        assert_eq!(cell.evaluate(&five), CellValue::Number(6.0));
    }

    #[test]
    fn test_needs_evaluation() {
        let cell = cell_with("=1+1");
        assert!(cell.needs_evaluation());
        cell.evaluate(&zero_lookup());
        assert!(!cell.needs_evaluation());
        assert!(!cell_with("text").needs_evaluation());
    }

    #[test]
    fn test_error_is_cached_as_value() {
        let cell = cell_with("=1/0");
        assert_eq!(cell.evaluate(&zero_lookup()), CellValue::Error(CellError::Div0));
        assert!(cell.content().has_cache());
    }

    #[test]
    fn test_replace_content_returns_old_edges() {
        let mut cell = cell_with("=A1+B1");
        assert_eq!(
            cell.referenced_cells(),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );

        let old = cell.replace_content(CellContent::Empty);
        assert_eq!(old.len(), 2);
        assert!(cell.referenced_cells().is_empty());
    }
}
