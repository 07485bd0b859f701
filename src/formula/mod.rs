//! Configurable numeric formulas
//!
//! Strategies store their formulas compiled; evaluation goes through the
//! [`FormulaEvaluator`] trait so callers can substitute their own scripting
//! engine.

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{BinOp, EvalError, Expr, ParseError, UnaryOp};
pub use evaluator::{ExpressionEvaluator, Formula, FormulaEvaluator, FormulaParams};
