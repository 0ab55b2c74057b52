//! Formula evaluator
//!
//! Evaluates formula ASTs to a number, or to the [`CellError`] that stopped
//! the computation.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use sheetcalc_core::{CellError, Position};

/// Source of referenced cell values during evaluation
pub trait CellLookup {
    /// Numeric value of the cell at `pos`, or the error it resolves to
    fn number_at(&self, pos: Position) -> Result<f64, CellError>;
}

impl<F> CellLookup for F
where
    F: Fn(Position) -> Result<f64, CellError>,
{
    fn number_at(&self, pos: Position) -> Result<f64, CellError> {
        self(pos)
    }
}

/// Evaluate a formula expression
///
/// The first error met (from a reference or from arithmetic) becomes the
/// result.
pub fn evaluate(expr: &FormulaExpr, ctx: &dyn CellLookup) -> Result<f64, CellError> {
    match expr {
        FormulaExpr::Number(n) => Ok(*n),

        FormulaExpr::CellRef(pos) if !pos.is_valid() => Err(CellError::Ref),
        FormulaExpr::CellRef(pos) => ctx.number_at(*pos),

        FormulaExpr::BinaryOp { op, left, right } => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            evaluate_binary_op(*op, l, r)
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let n = evaluate(operand, ctx)?;
            Ok(match op {
                UnaryOperator::Plus => n,
                UnaryOperator::Negate => -n,
            })
        }
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, l: f64, r: f64) -> Result<f64, CellError> {
    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => l / r,
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(CellError::Div0)
    }
}
