//! Syntax tree for strategy formulas.
//!
//! Formulas are small numeric programs: arithmetic over named parameters,
//! comparisons that yield 0 or 1, `if/then/else` and a fixed set of math
//! functions. Unknown functions and wrong arities are rejected at compile
//! time, so evaluating a compiled formula cannot fail on them.

use thiserror::Error;

use super::evaluator::FormulaParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    /// Named input such as `damage` or `constitution`
    Param(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `if cond then a else b`
    Cond {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("no such function '{0}'")]
    UnknownFunction(String),

    #[error("'{name}' takes {expected} argument(s), {got} given")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("bad formula {message}")]
pub struct ParseError {
    pub message: String,
}

impl From<EvalError> for ParseError {
    fn from(e: EvalError) -> Self {
        ParseError {
            message: e.to_string(),
        }
    }
}

/// Argument count of every built-in function
fn arity(name: &str) -> Option<usize> {
    match name {
        "abs" | "sqrt" | "floor" | "ceil" | "round" => Some(1),
        "min" | "max" | "pow" => Some(2),
        "clamp" => Some(3),
        _ => None,
    }
}

fn check_call(name: &str, got: usize) -> Result<(), EvalError> {
    let expected = arity(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
    if got != expected {
        return Err(EvalError::WrongArity {
            name: name.to_string(),
            expected,
            got,
        });
    }
    Ok(())
}

fn truthy(value: f64) -> bool {
    value != 0.0
}

fn flag(value: bool) -> f64 {
    f64::from(u8::from(value))
}

impl Expr {
    /// Reject calls to unknown functions or with the wrong arity
    pub fn validate(&self) -> Result<(), EvalError> {
        match self {
            Expr::Literal(_) | Expr::Param(_) => Ok(()),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.validate()?;
                rhs.validate()
            }
            Expr::Unary { operand, .. } => operand.validate(),
            Expr::Cond {
                cond,
                then,
                otherwise,
            } => {
                cond.validate()?;
                then.validate()?;
                otherwise.validate()
            }
            Expr::Call { name, args } => {
                check_call(name, args.len())?;
                args.iter().try_for_each(Expr::validate)
            }
        }
    }

    /// Every parameter name the formula reads, first occurrence order
    pub fn params(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.visit_params(&mut out);
        out
    }

    fn visit_params<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Param(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expr::Binary { lhs, rhs, .. } => {
                lhs.visit_params(out);
                rhs.visit_params(out);
            }
            Expr::Unary { operand, .. } => operand.visit_params(out),
            Expr::Cond {
                cond,
                then,
                otherwise,
            } => {
                for e in [cond, then, otherwise] {
                    e.visit_params(out);
                }
            }
            Expr::Call { args, .. } => args.iter().for_each(|a| a.visit_params(out)),
        }
    }

    /// Evaluate against named parameters.
    ///
    /// Missing parameters read as 0 and division by zero yields 0.
    pub fn eval(&self, params: &FormulaParams) -> Result<f64, EvalError> {
        Ok(match self {
            Expr::Literal(v) => *v,
            Expr::Param(name) => params.get(name).unwrap_or(0.0),
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval(params)?;
                match op {
                    BinOp::And if !truthy(l) => return Ok(0.0),
                    BinOp::Or if truthy(l) => return Ok(1.0),
                    _ => {}
                }
                let r = rhs.eval(params)?;
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div if r == 0.0 => 0.0,
                    BinOp::Div => l / r,
                    BinOp::Mod if r == 0.0 => 0.0,
                    BinOp::Mod => l % r,
                    BinOp::Pow => l.powf(r),
                    BinOp::Gt => flag(l > r),
                    BinOp::Lt => flag(l < r),
                    BinOp::Gte => flag(l >= r),
                    BinOp::Lte => flag(l <= r),
                    BinOp::Eq => flag(l == r),
                    BinOp::Neq => flag(l != r),
                    BinOp::And | BinOp::Or => flag(truthy(r)),
                }
            }
            Expr::Unary { op, operand } => {
                let v = operand.eval(params)?;
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Not => flag(!truthy(v)),
                }
            }
            Expr::Cond {
                cond,
                then,
                otherwise,
            } => {
                let branch = if truthy(cond.eval(params)?) {
                    then
                } else {
                    otherwise
                };
                return branch.eval(params);
            }
            Expr::Call { name, args } => {
                check_call(name, args.len())?;
                let v = args
                    .iter()
                    .map(|a| a.eval(params))
                    .collect::<Result<Vec<_>, _>>()?;
                match name.as_str() {
                    "abs" => v[0].abs(),
                    "sqrt" => v[0].max(0.0).sqrt(),
                    "floor" => v[0].floor(),
                    "ceil" => v[0].ceil(),
                    "round" => v[0].round(),
                    "min" => v[0].min(v[1]),
                    "max" => v[0].max(v[1]),
                    "pow" => v[0].powf(v[1]),
                    "clamp" => v[0].max(v[1]).min(v[2]),
                    _ => return Err(EvalError::UnknownFunction(name.clone())),
                }
            }
        })
    }
}
