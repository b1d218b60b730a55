//! Error types for Parseval.
//!
//! This module provides a unified error type [`ParsevalError`] that covers
//! all error conditions that can occur while lexing, parsing, evaluating or
//! translating an expression.

use thiserror::Error;

use crate::expr::Dialect;

/// Result type alias using [`ParsevalError`].
pub type Result<T> = std::result::Result<T, ParsevalError>;

/// Unified error type for all Parseval operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsevalError {
    // ============ Parsing Errors ============
    /// Unrecognized character in the input
    #[error("Lexer error at column {column}: {message}")]
    LexError { column: usize, message: String },

    /// Token stream does not match the grammar
    #[error("Syntax error at column {column}: {message}")]
    SyntaxError { column: usize, message: String },

    /// Identifier outside the declared variable set
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },

    /// A unit bracket outside the recognized shapes, or an unknown unit
    #[error("Unsupported unit expression '{unit}': {message}")]
    UnsupportedUnitExpression { unit: String, message: String },

    /// The facade was asked to parse in a dialect it does not hold
    #[error("Cannot parse a {actual} expression as {requested}")]
    DialectMismatch { requested: Dialect, actual: Dialect },

    /// A dialect name that is neither `spice` nor `comsol`
    #[error("Unknown dialect '{name}' (expected 'spice' or 'comsol')")]
    UnknownDialect { name: String },

    /// The declared variable list names the same variable twice
    #[error("Variable '{name}' declared more than once")]
    DuplicateVariable { name: String },

    // ============ Evaluation Errors ============
    /// Positional evaluation got the wrong number of values
    #[error("Expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Named evaluation did not bind a declared variable
    #[error("No value supplied for variable '{name}'")]
    MissingVariable { name: String },

    /// Denominator evaluated to exactly zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Exponentiation with no real result
    #[error("Non-real result for {base} ** {exponent}")]
    DomainError { base: f64, exponent: f64 },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl ParsevalError {
    /// Create a lexer error
    pub fn lexer(column: usize, message: impl Into<String>) -> Self {
        Self::LexError {
            column,
            message: message.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax(column: usize, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            column,
            message: message.into(),
        }
    }

    /// Create an unknown variable error
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Self::UnknownVariable { name: name.into() }
    }

    /// Create an unsupported unit expression error
    pub fn unsupported_unit(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedUnitExpression {
            unit: unit.into(),
            message: message.into(),
        }
    }
}
