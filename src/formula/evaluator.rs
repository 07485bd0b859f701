//! Compiled formulas and the evaluator seam.

use ahash::AHashMap;

use super::ast::{Expr, ParseError};
use super::parser::parse_expr;

/// Named numeric inputs for a formula
#[derive(Debug, Clone, Default)]
pub struct FormulaParams {
    values: AHashMap<String, f64>,
}

impl FormulaParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn extend<'a>(&mut self, values: impl IntoIterator<Item = (&'a String, &'a f64)>) {
        for (name, value) in values {
            self.values.insert(name.clone(), *value);
        }
    }
}

/// A formula parsed and checked at load time
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse and validate a formula
    pub fn compile(source: &str) -> Result<Self, ParseError> {
        let expr = parse_expr(source)?;
        expr.validate()?;
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    /// A formula that always evaluates to `value`
    pub fn constant(value: f64) -> Self {
        Self {
            source: value.to_string(),
            expr: Expr::Literal(value),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

/// Evaluates strategy formulas with named parameters.
///
/// Implementations must be total: a formula that cannot produce a finite
/// number evaluates to 0.
pub trait FormulaEvaluator {
    fn evaluate(&self, formula: &Formula, params: &FormulaParams) -> f64;
}

/// Tree-walking evaluator over the compiled AST
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl FormulaEvaluator for ExpressionEvaluator {
    fn evaluate(&self, formula: &Formula, params: &FormulaParams) -> f64 {
        match formula.expr().eval(params) {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                tracing::warn!(
                    "Formula '{}' produced non-finite value {}; using 0",
                    formula.source(),
                    value
                );
                0.0
            }
            Err(e) => {
                tracing::warn!("Formula '{}' failed: {}; using 0", formula.source(), e);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_rejects_unknown_function() {
        let err = Formula::compile("explode(damage)").unwrap_err();
        assert!(err.message.contains("explode"));
    }

    #[test]
    fn test_evaluate_with_params() {
        let formula = Formula::compile("100 + con * 2").unwrap();
        let params = FormulaParams::new().with("con", 15.0);
        assert_eq!(ExpressionEvaluator.evaluate(&formula, &params), 130.0);
    }

    #[test]
    fn test_non_finite_becomes_zero() {
        let formula = Formula::compile("pow(10, 400)").unwrap();
        assert_eq!(
            ExpressionEvaluator.evaluate(&formula, &FormulaParams::new()),
            0.0
        );
    }

    #[test]
    fn test_zero_denominator_tolerated() {
        let formula = Formula::compile("damage / liver").unwrap();
        let params = FormulaParams::new().with("damage", 8.0);
        assert_eq!(ExpressionEvaluator.evaluate(&formula, &params), 0.0);
    }

    #[test]
    fn test_constant() {
        let formula = Formula::constant(12.5);
        assert_eq!(
            ExpressionEvaluator.evaluate(&formula, &FormulaParams::new()),
            12.5
        );
    }
}
