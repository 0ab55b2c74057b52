//! Parsed formula handle

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::{self, CellLookup};
use crate::parser::parse_expression;
use sheetcalc_core::{CellError, Position};

/// A parsed formula together with the cells it reads
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: FormulaExpr,
    referenced: Vec<Position>,
}

/// Parse the expression part of a formula (the text after `=`)
pub fn parse_formula(expression: &str) -> FormulaResult<Formula> {
    parse_expression(expression).map(Formula::from_ast)
}

impl Formula {
    /// Wrap an AST, computing its sorted, de-duplicated valid references
    pub fn from_ast(ast: FormulaExpr) -> Self {
        let mut referenced = Vec::new();
        ast.collect_cells(&mut referenced);
        referenced.retain(Position::is_valid);
        referenced.sort_unstable();
        referenced.dedup();
        Self { ast, referenced }
    }

    /// Evaluate against a cell lookup
    pub fn evaluate(&self, ctx: &dyn CellLookup) -> Result<f64, CellError> {
        evaluator::evaluate(&self.ast, ctx)
    }

    /// Canonical expression text, without the leading `=`
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// Valid cells read by this formula, sorted and without duplicates
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }
}
