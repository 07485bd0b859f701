//! `nom` grammar for strategy formulas.
//!
//! Precedence, loosest first: `if/then/else`, `||`, `&&`, comparisons,
//! `+ -`, `* / %`, unary `- !`, `^` (right associative), atoms.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char, multispace0, satisfy};
use nom::combinator::{all_consuming, map, not, opt, recognize, value};
use nom::error::ParseError as NomParseError;
use nom::multi::{many0, separated_list0};
use nom::number::complete::double;
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::{IResult, Parser};

use super::ast::{BinOp, Expr, ParseError, UnaryOp};

type Res<'a, T> = IResult<&'a str, T>;

/// Parse a complete formula, rejecting trailing input
pub fn parse_expr(input: &str) -> Result<Expr, ParseError> {
    match all_consuming(ws(expr)).parse(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(e) => Err(ParseError {
            message: format!("'{}': {}", input, e),
        }),
    }
}

fn ws<'a, O, E: NomParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(
        tag(word),
        not(satisfy(|c: char| c.is_alphanumeric() || c == '_')),
    )
}

fn fold(first: Expr, rest: Vec<(BinOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |lhs, (op, rhs)| Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

fn expr(i: &str) -> Res<'_, Expr> {
    alt((conditional, or_expr)).parse(i)
}

fn conditional(i: &str) -> Res<'_, Expr> {
    let (i, _) = ws(keyword("if")).parse(i)?;
    let (i, cond) = or_expr(i)?;
    let (i, _) = ws(keyword("then")).parse(i)?;
    let (i, then) = expr(i)?;
    let (i, _) = ws(keyword("else")).parse(i)?;
    let (i, otherwise) = expr(i)?;
    Ok((
        i,
        Expr::Cond {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        },
    ))
}

fn or_expr(i: &str) -> Res<'_, Expr> {
    let (i, first) = and_expr(i)?;
    let (i, rest) = many0(pair(value(BinOp::Or, ws(tag("||"))), and_expr)).parse(i)?;
    Ok((i, fold(first, rest)))
}

fn and_expr(i: &str) -> Res<'_, Expr> {
    let (i, first) = comparison(i)?;
    let (i, rest) = many0(pair(value(BinOp::And, ws(tag("&&"))), comparison)).parse(i)?;
    Ok((i, fold(first, rest)))
}

fn comparison_op(i: &str) -> Res<'_, BinOp> {
    ws(alt((
        value(BinOp::Eq, tag("==")),
        value(BinOp::Neq, tag("!=")),
        value(BinOp::Gte, tag(">=")),
        value(BinOp::Lte, tag("<=")),
        value(BinOp::Gt, tag(">")),
        value(BinOp::Lt, tag("<")),
    )))
    .parse(i)
}

fn comparison(i: &str) -> Res<'_, Expr> {
    let (i, first) = additive(i)?;
    let (i, rest) = opt(pair(comparison_op, additive)).parse(i)?;
    Ok((i, fold(first, rest.into_iter().collect())))
}

fn additive(i: &str) -> Res<'_, Expr> {
    let (i, first) = multiplicative(i)?;
    let (i, rest) = many0(pair(
        ws(alt((value(BinOp::Add, char('+')), value(BinOp::Sub, char('-'))))),
        multiplicative,
    ))
    .parse(i)?;
    Ok((i, fold(first, rest)))
}

fn multiplicative(i: &str) -> Res<'_, Expr> {
    let (i, first) = unary(i)?;
    let (i, rest) = many0(pair(
        ws(alt((
            value(BinOp::Mul, char('*')),
            value(BinOp::Div, char('/')),
            value(BinOp::Mod, char('%')),
        ))),
        unary,
    ))
    .parse(i)?;
    Ok((i, fold(first, rest)))
}

fn unary(i: &str) -> Res<'_, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |operand| Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        }),
        map(preceded(ws(char('!')), unary), |operand| Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }),
        power,
    ))
    .parse(i)
}

fn power(i: &str) -> Res<'_, Expr> {
    let (i, base) = atom(i)?;
    let (i, exponent) = opt(preceded(ws(char('^')), unary)).parse(i)?;
    Ok((
        i,
        match exponent {
            Some(exponent) => Expr::Binary {
                op: BinOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            },
            None => base,
        },
    ))
}

fn identifier(i: &str) -> Res<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(i)
}

fn function_call(i: &str) -> Res<'_, Expr> {
    map(
        pair(
            identifier,
            preceded(
                multispace0,
                delimited(char('('), separated_list0(char(','), expr), char(')')),
            ),
        ),
        |(name, args)| Expr::Call {
            name: name.to_string(),
            args,
        },
    )
    .parse(i)
}

fn atom(i: &str) -> Res<'_, Expr> {
    ws(alt((
        function_call,
        map(identifier, |name: &str| Expr::Param(name.to_string())),
        map(double, Expr::Literal),
        delimited(char('('), expr, char(')')),
    )))
    .parse(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Expr {
        Expr::Param(name.to_string())
    }

    #[test]
    fn test_literal_parsing() {
        assert_eq!(parse_expr("42.5").unwrap(), Expr::Literal(42.5));
        assert_eq!(parse_expr("42").unwrap(), Expr::Literal(42.0));
    }

    #[test]
    fn test_param_with_underscore() {
        assert_eq!(parse_expr("original_damage").unwrap(), p("original_damage"));
    }

    #[test]
    fn test_operator_precedence_mul_over_add() {
        match parse_expr("a + b * c").unwrap() {
            Expr::Binary {
                op: BinOp::Add,
                lhs,
                rhs,
            } => {
                assert_eq!(*lhs, p("a"));
                assert!(matches!(*rhs, Expr::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("Expected binary Add, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        match parse_expr("(a + b) * c").unwrap() {
            Expr::Binary {
                op: BinOp::Mul,
                lhs,
                rhs,
            } => {
                assert!(matches!(*lhs, Expr::Binary { op: BinOp::Add, .. }));
                assert_eq!(*rhs, p("c"));
            }
            other => panic!("Expected binary Mul, got {:?}", other),
        }
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = parse_expr("10 - 4 - 3").unwrap();
        assert_eq!(
            expr.eval(&crate::formula::FormulaParams::new()).unwrap(),
            3.0
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse_expr("2 ^ 3 ^ 2").unwrap();
        assert_eq!(
            expr.eval(&crate::formula::FormulaParams::new()).unwrap(),
            512.0
        );
    }

    #[test]
    fn test_comparison_and_logic() {
        match parse_expr("a >= b && !c").unwrap() {
            Expr::Binary {
                op: BinOp::And,
                lhs,
                rhs,
            } => {
                assert!(matches!(*lhs, Expr::Binary { op: BinOp::Gte, .. }));
                assert!(matches!(*rhs, Expr::Unary { op: UnaryOp::Not, .. }));
            }
            other => panic!("Expected binary And, got {:?}", other),
        }
    }

    #[test]
    fn test_not_equal_is_not_unary_not() {
        assert!(matches!(
            parse_expr("a != b").unwrap(),
            Expr::Binary { op: BinOp::Neq, .. }
        ));
    }

    #[test]
    fn test_function_call_multiple_args() {
        match parse_expr("clamp(damage, 0, 100)").unwrap() {
            Expr::Call { name, args } => {
                assert_eq!(name, "clamp");
                assert_eq!(args.len(), 3);
                assert_eq!(args[0], p("damage"));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_conditional_expression() {
        match parse_expr("if x > 0 then x else -x").unwrap() {
            Expr::Cond {
                cond,
                then,
                otherwise,
            } => {
                assert!(matches!(*cond, Expr::Binary { op: BinOp::Gt, .. }));
                assert_eq!(*then, p("x"));
                assert!(matches!(*otherwise, Expr::Unary { op: UnaryOp::Neg, .. }));
            }
            other => panic!("Expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_starting_with_keyword() {
        assert_eq!(parse_expr("iffy").unwrap(), p("iffy"));
        assert!(matches!(
            parse_expr("if then_value then 1 else 0").unwrap(),
            Expr::Cond { .. }
        ));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(parse_expr("a + ").is_err());
        assert!(parse_expr("a b").is_err());
        assert!(parse_expr("").is_err());
    }
}
