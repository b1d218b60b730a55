//! Numeric evaluation of expression trees.
//!
//! Evaluation uses IEEE double precision throughout. Bindings are always
//! given in each variable's declared space, so [`Node::TempVar`] reads its
//! binding exactly like [`Node::VarRef`] and [`Node::AbsTemp`] shifts its
//! Celsius binding to Kelvin.

use std::collections::HashMap;

use crate::error::{ParsevalError, Result};
use crate::expr::{BinOp, Node, UnaryOp};
use crate::ZERO_CELSIUS;

/// Variable bindings, keyed by declared name.
pub type Bindings<'a> = HashMap<&'a str, f64>;

/// Evaluate `node` under `env`.
pub fn evaluate(node: &Node, env: &Bindings<'_>) -> Result<f64> {
    match node {
        Node::Literal { value, .. } => Ok(*value),
        Node::VarRef(name) | Node::TempVar(name) => env
            .get(name.as_str())
            .copied()
            .ok_or_else(|| ParsevalError::MissingVariable { name: name.clone() }),
        Node::AbsTemp(name) => env
            .get(name.as_str())
            .map(|celsius| celsius + ZERO_CELSIUS)
            .ok_or_else(|| ParsevalError::MissingVariable { name: name.clone() }),
        Node::UnaryOp {
            op: UnaryOp::Negate,
            operand,
        } => Ok(-evaluate(operand, env)?),
        Node::BinOp { op, left, right } => {
            let lhs = evaluate(left, env)?;
            let rhs = evaluate(right, env)?;
            apply(*op, lhs, rhs)
        }
    }
}

fn apply(op: BinOp, lhs: f64, rhs: f64) -> Result<f64> {
    match op {
        BinOp::Add => Ok(lhs + rhs),
        BinOp::Sub => Ok(lhs - rhs),
        BinOp::Mul => Ok(lhs * rhs),
        BinOp::Div => {
            if rhs == 0.0 {
                return Err(ParsevalError::DivisionByZero);
            }
            Ok(lhs / rhs)
        }
        BinOp::Pow => power(lhs, rhs),
    }
}

/// Real exponentiation.
///
/// A zero base with a negative exponent is a division by zero; a negative
/// base with a non-integer exponent has no real result.
fn power(base: f64, exponent: f64) -> Result<f64> {
    if base == 0.0 && exponent < 0.0 {
        return Err(ParsevalError::DivisionByZero);
    }
    let result = base.powf(exponent);
    if result.is_nan() && !base.is_nan() && !exponent.is_nan() {
        return Err(ParsevalError::DomainError { base, exponent });
    }
    Ok(result)
}
