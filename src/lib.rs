//! # Parseval
//!
//! Parse, evaluate and translate algebraic expressions between SPICE and
//! COMSOL syntax.
//!
//! This library provides:
//! - A tokenizer and a recursive-descent parser for both dialects
//! - A dialect-neutral expression tree shared by both parsers
//! - Numeric evaluation with positional or named variable bindings
//! - Code generation back into either dialect, including the COMSOL
//!   Celsius/Kelvin idiom `((T-0[degC])/1[K])`
//!
//! ## Architecture
//!
//! - [`expr`] - Lexer, tree types, parsers and the unit/idiom rewrite
//! - [`eval`] - Numeric evaluation
//! - [`codegen`] - Rendering trees as SPICE or COMSOL text
//! - [`expr_parser`] - The [`ExprParser`] facade tying the above together
//! - [`config`] - Temperature alias configuration
//!
//! ## Usage
//!
//! ```
//! use parseval::{Dialect, ExprParser};
//!
//! let spice = ExprParser::new("99.9-0.222*temp+0.444e-5*temp**2", ["temp"], Dialect::Spice)?;
//! assert_eq!(
//!     spice.generate_comsol()?,
//!     "99.9-0.222*((T-0[degC])/1[K])+0.444e-5*((T-0[degC])/1[K])^2"
//! );
//!
//! let value = spice.keval([("temp", 25.0)])?;
//! assert_eq!(value, spice.aeval(&[25.0])?);
//! # Ok::<(), parseval::ParsevalError>(())
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! parseval convert --from spice --vars temp "99.9-0.222*temp"
//! parseval eval --from comsol --vars T --values 298.15 "(T/1[K])^2"
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod expr_parser;

// Re-export main types for convenience
pub use config::ExprConfig;
pub use error::{ParsevalError, Result};
pub use expr::{Dialect, Node};
pub use expr_parser::ExprParser;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmExpr;

/// Kelvin value of 0 degrees Celsius
pub const ZERO_CELSIUS: f64 = 273.15;
