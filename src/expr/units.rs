//! Unit handling for COMSOL expressions.
//!
//! Only the two temperature units used by the Celsius/Kelvin idiom are
//! supported. Unit-qualified literals are normalized to Kelvin at parse
//! time, and [`collapse_temperature_idiom`] rewrites the interior of a
//! `(...)/1[K]` group into a [`Node::TempVar`] when it has the shape
//! `IDENT - 0[degC]`. [`absolute_temperature`] handles the companion
//! `T/1[K]` idiom, the unitless absolute temperature.

use std::fmt;

use log::debug;

use super::ast::{BinOp, Node};
use crate::config::ExprConfig;
use crate::error::{ParsevalError, Result};
use crate::ZERO_CELSIUS;

/// A unit accepted inside `[...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Kelvin, `[K]`
    Kelvin,
    /// Degrees Celsius, `[degC]`
    Celsius,
}

impl Unit {
    /// Look up a unit by its COMSOL symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "K" => Some(Self::Kelvin),
            "degC" => Some(Self::Celsius),
            _ => None,
        }
    }

    /// COMSOL symbol of the unit.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Kelvin => "K",
            Self::Celsius => "degC",
        }
    }

    /// Convert a value expressed in this unit to Kelvin.
    pub fn to_kelvin(self, value: f64) -> f64 {
        match self {
            Self::Kelvin => value,
            Self::Celsius => value + ZERO_CELSIUS,
        }
    }

    /// Convert a Kelvin value back into this unit.
    pub fn from_kelvin(self, kelvin: f64) -> f64 {
        match self {
            Self::Kelvin => kelvin,
            Self::Celsius => kelvin - ZERO_CELSIUS,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Build a unit-qualified literal, normalizing its value to Kelvin.
pub fn unit_literal(text: String, value: f64, unit: Unit) -> Node {
    Node::Literal {
        value: unit.to_kelvin(value),
        text: Some(text),
        unit: Some(unit),
    }
}

/// True for the `1[K]` divisor that strips a unit from a group.
pub fn is_unit_divisor(node: &Node) -> bool {
    matches!(
        node,
        Node::Literal {
            value,
            unit: Some(Unit::Kelvin),
            ..
        } if *value == 1.0
    )
}

/// Rewrite `IDENT - 0[degC]` into a Celsius-space [`Node::TempVar`].
///
/// The match is structural, so whitespace and redundant parentheses in the
/// source do not matter. Shapes that do not match are returned unchanged.
/// An identifier that is itself declared is a Kelvin-space variable and is
/// left as plain subtraction.
pub fn collapse_temperature_idiom(node: Node, var_names: &[String], config: &ExprConfig) -> Result<Node> {
    let kelvin_name = match &node {
        Node::BinOp {
            op: BinOp::Sub,
            left,
            right,
        } => match (left.as_ref(), right.as_ref()) {
            (
                Node::VarRef(name),
                Node::Literal {
                    value,
                    unit: Some(Unit::Celsius),
                    ..
                },
            ) if *value == ZERO_CELSIUS => name.clone(),
            _ => return Ok(node),
        },
        _ => return Ok(node),
    };

    if var_names.iter().any(|n| *n == kelvin_name) {
        return Ok(node);
    }

    match config.celsius_name(&kelvin_name) {
        Some(celsius) if var_names.iter().any(|n| n == celsius) => {
            debug!("collapsed temperature idiom: {} -> {}", kelvin_name, celsius);
            Ok(Node::TempVar(celsius.to_string()))
        }
        _ => Err(ParsevalError::unknown_variable(kelvin_name)),
    }
}

/// Rewrite `IDENT/1[K]` into a [`Node::AbsTemp`] over the Celsius-space
/// variable aliased by `IDENT`.
///
/// Returns `None` when `IDENT` is declared itself or has no declared
/// Celsius counterpart; the division is then kept as written.
pub fn absolute_temperature(kelvin_name: &str, var_names: &[String], config: &ExprConfig) -> Option<Node> {
    if var_names.iter().any(|n| n == kelvin_name) {
        return None;
    }
    let celsius = config.celsius_name(kelvin_name)?;
    if !var_names.iter().any(|n| n == celsius) {
        return None;
    }
    debug!("collapsed absolute temperature: {} -> {}", kelvin_name, celsius);
    Some(Node::AbsTemp(celsius.to_string()))
}

/// Render the COMSOL idiom for a Kelvin-space variable name.
pub fn temperature_idiom(kelvin_name: &str) -> String {
    format!("(({}-0[degC])/1[K])", kelvin_name)
}

/// Render the COMSOL absolute-temperature idiom for a Kelvin-space name.
pub fn absolute_temperature_idiom(kelvin_name: &str) -> String {
    format!("({}/1[K])", kelvin_name)
}
