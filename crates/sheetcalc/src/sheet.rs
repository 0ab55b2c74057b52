//! Sheet implementation

use std::collections::BTreeMap;

use sheetcalc_core::{CellError, CellValue, Error, Position, Result, Size};
use sheetcalc_formula::CellLookup;

use crate::cell::{Cell, CellContent};
use crate::graph;

/// A sheet of cells with formula dependency tracking
///
/// Cells are stored sparsely, row by row. Each cell keeps coordinate-keyed
/// edges to the cells it reads and to the cells reading it; every edit keeps
/// the two directions mirror images of each other and rejects edits that
/// would introduce a cycle.
///
/// Formula values are computed lazily on read and cached until one of the
/// cells they depend on changes.
#[derive(Debug, Default)]
pub struct Sheet {
    /// Row index → column map
    rows: BTreeMap<i32, BTreeMap<i32, Cell>>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    // === Edits ===

    /// Set the text of a cell
    ///
    /// Text starting with `=` (and longer than that) is parsed as a formula.
    /// Cells a formula references are created empty if they don't exist yet;
    /// those placeholders stay even when the edit is then rejected.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPosition`] if `pos` lies outside the sheet
    /// - [`Error::FormulaSyntax`] if the formula does not parse
    /// - [`Error::CircularDependency`] if the formula would make the cell
    ///   depend on itself
    ///
    /// On error the previous content and all edges are unchanged.
    pub fn set_cell(&mut self, pos: Position, text: impl Into<String>) -> Result<()> {
        Self::check_position(pos)?;

        let content = CellContent::parse(text.into())?;
        let references = content.referenced_cells().to_vec();

        for &r in &references {
            self.ensure_cell(r);
        }

        let this = &*self;
        if graph::would_create_cycle(pos, &references, |p| this.entry(p)) {
            log::debug!("rejected formula for {}: circular dependency", pos);
            return Err(Error::CircularDependency(pos));
        }

        self.commit(pos, content);
        log::debug!("set {} ({} references)", pos, references.len());
        Ok(())
    }

    /// Clear a cell
    ///
    /// The cell entry is kept (with empty content) so formulas reading it
    /// still find their edges. Its own references are dropped since empty
    /// content reads nothing. Clearing a cell that was never set is a no-op.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        Self::check_position(pos)?;

        if self.entry(pos).is_some() {
            self.commit(pos, CellContent::Empty);
            log::debug!("cleared {}", pos);
        }
        Ok(())
    }

    /// Clear every cell
    ///
    /// Entries are kept as empty tombstones, like [`Sheet::clear_cell`].
    /// With no content left nothing references anything, so all edges go.
    pub fn clear(&mut self) {
        for cell in self.rows.values_mut().flat_map(BTreeMap::values_mut) {
            *cell = Cell::new();
        }
        log::debug!("cleared sheet");
    }

    // === Access ===

    /// Get a cell for reading
    ///
    /// Returns `Ok(None)` for cells that were never set and for cells whose
    /// text is empty (placeholders and cleared cells).
    pub fn cell(&self, pos: Position) -> Result<Option<&Cell>> {
        Self::check_position(pos)?;
        Ok(self.entry(pos).filter(|cell| cell.has_text()))
    }

    /// Get a cell for modification
    ///
    /// Unlike [`Sheet::cell`], empty entries are returned too.
    pub fn cell_mut(&mut self, pos: Position) -> Result<Option<&mut Cell>> {
        Self::check_position(pos)?;
        Ok(self.entry_mut(pos))
    }

    /// Value of the cell at `pos`, if it has content
    ///
    /// Formulas are evaluated against this sheet and cached.
    pub fn value(&self, pos: Position) -> Result<Option<CellValue>> {
        Ok(self.cell(pos)?.map(|cell| self.resolve(pos, cell)))
    }

    /// Text of the cell at `pos`, if it has content
    pub fn text(&self, pos: Position) -> Result<Option<String>> {
        Ok(self.cell(pos)?.map(Cell::text))
    }

    /// Smallest rectangle anchored at A1 covering every cell with text
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (&row, cols) in &self.rows {
            if let Some((&col, _)) = cols.iter().rev().find(|(_, cell)| cell.has_text()) {
                size.rows = size.rows.max(row + 1);
                size.cols = size.cols.max(col + 1);
            }
        }
        size
    }

    /// Number of stored cell entries, including empty ones
    pub fn entry_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Iterate over cells with content in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.rows.iter().flat_map(|(&row, cols)| {
            cols.iter()
                .filter(|(_, cell)| cell.has_text())
                .map(move |(&col, cell)| (Position::new(row, col), cell))
        })
    }

    // === Internals ===

    /// Value of `cell`, stored at `pos`
    ///
    /// Uncached formulas it depends on are evaluated first, dependencies
    /// before dependents, so every evaluation finds its inputs cached.
    pub(crate) fn resolve(&self, pos: Position, cell: &Cell) -> CellValue {
        if cell.needs_evaluation() {
            let order = graph::evaluation_order(pos, |p| self.entry(p));
            log::trace!("evaluating {} formulas for {}", order.len(), pos);
            for p in order {
                if let Some(dependency) = self.entry(p) {
                    dependency.evaluate(self);
                }
            }
        }
        cell.evaluate(self)
    }

    fn check_position(pos: Position) -> Result<()> {
        if pos.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidPosition(pos))
        }
    }

    /// Stored entry at `pos`, empty or not
    pub(crate) fn entry(&self, pos: Position) -> Option<&Cell> {
        self.rows.get(&pos.row).and_then(|row| row.get(&pos.col))
    }

    fn ensure_cell(&mut self, pos: Position) -> &mut Cell {
        self.rows
            .entry(pos.row)
            .or_default()
            .entry(pos.col)
            .or_default()
    }

    /// Install `content` at `pos`, rewire edges and invalidate dependents
    ///
    /// Every position `content` references must already have an entry.
    fn commit(&mut self, pos: Position, content: CellContent) {
        let new_refs: Vec<Position> = content.referenced_cells().to_vec();
        let old_refs = self.ensure_cell(pos).replace_content(content);

        for old in old_refs {
            if let Some(cell) = self.entry_mut(old) {
                cell.remove_dependent(pos);
            }
        }
        for new in new_refs {
            self.ensure_cell(new).add_dependent(pos);
        }

        self.invalidate(pos);
    }

    /// Drop cached results of `pos` and everything depending on it
    fn invalidate(&mut self, pos: Position) {
        let this = &*self;
        let affected = graph::dependents_closure(pos, |p| this.entry(p));
        log::trace!("invalidating {} cells from {}", affected.len(), pos);
        for p in affected {
            if let Some(cell) = self.entry_mut(p) {
                cell.invalidate_cache();
            }
        }
    }

    fn entry_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.rows.get_mut(&pos.row).and_then(|row| row.get_mut(&pos.col))
    }
}

/// Resolves references for formula evaluation
///
/// - positions outside the sheet are `#REF!`
/// - missing and empty cells count as zero
/// - text must parse as a number in full, otherwise it is `#VALUE!`
/// - errors propagate unchanged
impl CellLookup for Sheet {
    fn number_at(&self, pos: Position) -> std::result::Result<f64, CellError> {
        if !pos.is_valid() {
            return Err(CellError::Ref);
        }

        let Some(cell) = self.entry(pos).filter(|cell| cell.has_text()) else {
            return Ok(0.0);
        };

        match self.resolve(pos, cell) {
            CellValue::Number(n) => Ok(n),
            CellValue::Text(text) if text.is_empty() => Ok(0.0),
            CellValue::Text(text) => parse_number(&text).ok_or(CellError::Value),
            CellValue::Error(e) => Err(e),
        }
    }
}

/// Parse cell text as a finite decimal number
fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let looks_numeric = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'));
    if !looks_numeric {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
