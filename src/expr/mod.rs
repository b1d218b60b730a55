//! Expression front end shared by the SPICE and COMSOL dialects.
//!
//! Both dialects describe the same arithmetic language and differ only in
//! surface details: SPICE spells exponentiation `**`, COMSOL spells it `^`
//! and allows unit brackets after numbers.
//!
//! # Grammar
//!
//! ```text
//! expr    = term { ('+' | '-') term }
//! term    = factor { ('*' | '/') factor }
//! factor  = unary [ EXP factor ]          (* right-associative *)
//! unary   = '-' unary | primary
//! primary = number [ unit ] | identifier | '(' expr ')'
//! unit    = '[' ( 'K' | 'degC' ) ']'      (* COMSOL only *)
//!
//! EXP     = "**" (SPICE) | "^" (COMSOL)
//! number  = digits [ '.' digits ] [ ('e' | 'E') ['+' | '-'] digits ]
//! identifier = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! # Temperature idiom
//!
//! COMSOL text writes a Celsius-space temperature as `((T-0[degC])/1[K])`:
//! the Kelvin-space variable `T` shifted to Celsius and stripped of its
//! unit. The COMSOL parser collapses that shape into a single
//! [`Node::TempVar`] naming the Celsius-space variable (for example `temp`),
//! and the generator re-synthesizes it when writing COMSOL.
//!
//! The absolute temperature is written `(T/1[K])` in COMSOL and
//! `(temp+273.15)` in SPICE. COMSOL's form collapses into a
//! [`Node::AbsTemp`]; SPICE's `temp+273.15` is written back as `(T/1[K])`.
//!
//! A `/1[K]` divisor strips the unit from a parenthesized group whether or
//! not the divisor is itself parenthesized.

mod ast;
mod lexer;
mod parser;
pub mod units;

use std::fmt;
use std::str::FromStr;

pub use ast::*;
pub use lexer::{Lexer, Operator, Token, TokenKind};
pub use parser::Parser;

use crate::config::ExprConfig;
use crate::error::{ParsevalError, Result};

/// One of the two surface syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Dialect {
    /// SPICE arithmetic, `**` for powers
    Spice,
    /// COMSOL arithmetic, `^` for powers, `[unit]` suffixes
    Comsol,
}

impl Dialect {
    /// Spelling of the exponentiation operator.
    pub fn power_symbol(self) -> &'static str {
        match self {
            Self::Spice => "**",
            Self::Comsol => "^",
        }
    }

    /// The other dialect.
    pub fn other(self) -> Self {
        match self {
            Self::Spice => Self::Comsol,
            Self::Comsol => Self::Spice,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spice => write!(f, "spice"),
            Self::Comsol => write!(f, "comsol"),
        }
    }
}

impl FromStr for Dialect {
    type Err = ParsevalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spice" => Ok(Self::Spice),
            "comsol" => Ok(Self::Comsol),
            _ => Err(ParsevalError::UnknownDialect {
                name: s.to_string(),
            }),
        }
    }
}

/// Parse an expression in the given dialect.
///
/// `var_names` is the declared variable set; `config` supplies the
/// Celsius/Kelvin name correspondence used by the COMSOL idiom.
pub fn parse(input: &str, dialect: Dialect, var_names: &[String], config: &ExprConfig) -> Result<Node> {
    let mut parser = Parser::new(input, dialect, var_names, config)?;
    parser.parse()
}
