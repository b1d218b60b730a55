//! WASM bindings for Parseval.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmExpr } from 'parseval';
//!
//! await init();
//!
//! const expr = new WasmExpr("99.9-0.222*temp", ["temp"], "spice");
//! expr.generate_comsol();   // "99.9-0.222*((T-0[degC])/1[K])"
//! expr.aeval([25.0]);
//! expr.keval(["temp"], [25.0]);
//! ```

use wasm_bindgen::prelude::*;

use crate::error::ParsevalError;
use crate::expr::Dialect;
use crate::ExprParser;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: ParsevalError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible expression wrapper.
#[wasm_bindgen]
pub struct WasmExpr {
    parser: ExprParser,
}

#[wasm_bindgen]
impl WasmExpr {
    /// Create an expression.
    ///
    /// # Arguments
    /// * `expr` - Expression text
    /// * `var_names` - Declared variable names, in positional order
    /// * `language` - `"spice"` or `"comsol"`
    #[wasm_bindgen(constructor)]
    pub fn new(expr: &str, var_names: Vec<String>, language: &str) -> Result<WasmExpr, JsValue> {
        let language: Dialect = language.parse().map_err(to_js)?;
        let parser = ExprParser::new(expr, var_names, language).map_err(to_js)?;
        Ok(WasmExpr { parser })
    }

    /// Evaluate with values bound by position.
    #[wasm_bindgen]
    pub fn aeval(&self, values: &[f64]) -> Result<f64, JsValue> {
        self.parser.aeval(values).map_err(to_js)
    }

    /// Evaluate with values bound by name; `names[i]` receives `values[i]`.
    #[wasm_bindgen]
    pub fn keval(&self, names: Vec<String>, values: &[f64]) -> Result<f64, JsValue> {
        if names.len() != values.len() {
            return Err(to_js(ParsevalError::WasmError {
                message: format!("{} names but {} values", names.len(), values.len()),
            }));
        }
        self.parser
            .keval(names.into_iter().zip(values.iter().copied()))
            .map_err(to_js)
    }

    /// Render as SPICE text.
    #[wasm_bindgen]
    pub fn generate_spice(&self) -> Result<String, JsValue> {
        self.parser.generate_spice().map_err(to_js)
    }

    /// Render as COMSOL text.
    #[wasm_bindgen]
    pub fn generate_comsol(&self) -> Result<String, JsValue> {
        self.parser.generate_comsol().map_err(to_js)
    }

    /// Source dialect name.
    #[wasm_bindgen(getter)]
    pub fn language(&self) -> String {
        self.parser.language().to_string()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
