//! The [`ExprParser`] facade.
//!
//! An `ExprParser` owns one expression string, its declared variables and
//! its source dialect. The tree is parsed on first use and cached; all
//! later evaluations and translations reuse it.

use std::collections::HashSet;

use log::debug;
use once_cell::sync::OnceCell;

use crate::codegen::Generator;
use crate::config::ExprConfig;
use crate::error::{ParsevalError, Result};
use crate::eval::{evaluate, Bindings};
use crate::expr::{self, Dialect, Node};

/// Parse, evaluate and translate a single expression.
#[derive(Debug)]
pub struct ExprParser {
    expr: String,
    var_names: Vec<String>,
    language: Dialect,
    config: ExprConfig,
    ast: OnceCell<Node>,
}

impl ExprParser {
    /// Create a parser with the default configuration.
    ///
    /// Fails with [`ParsevalError::DuplicateVariable`] when `var_names`
    /// repeats a name.
    pub fn new<S: Into<String>>(
        expr: impl Into<String>,
        var_names: impl IntoIterator<Item = S>,
        language: Dialect,
    ) -> Result<Self> {
        Self::with_config(expr, var_names, language, ExprConfig::default())
    }

    /// Create a parser with an explicit configuration.
    pub fn with_config<S: Into<String>>(
        expr: impl Into<String>,
        var_names: impl IntoIterator<Item = S>,
        language: Dialect,
        config: ExprConfig,
    ) -> Result<Self> {
        let var_names: Vec<String> = var_names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for name in &var_names {
            if !seen.insert(name.as_str()) {
                return Err(ParsevalError::DuplicateVariable { name: name.clone() });
            }
        }

        Ok(Self {
            expr: expr.into(),
            var_names,
            language,
            config,
            ast: OnceCell::new(),
        })
    }

    /// The expression text as given.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Declared variable names, in positional order.
    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    /// Dialect the expression is written in.
    pub fn language(&self) -> Dialect {
        self.language
    }

    /// Configuration in use.
    pub fn config(&self) -> &ExprConfig {
        &self.config
    }

    /// Parse the expression as `dialect`.
    ///
    /// `dialect` must be the source dialect; the tree is computed once and
    /// cached. A failed parse is not cached and is reported again on the
    /// next call.
    pub fn parse(&self, dialect: Dialect) -> Result<&Node> {
        if dialect != self.language {
            return Err(ParsevalError::DialectMismatch {
                requested: dialect,
                actual: self.language,
            });
        }
        self.ast()
    }

    /// The parsed tree, parsing on first use.
    pub fn ast(&self) -> Result<&Node> {
        self.ast.get_or_try_init(|| {
            let node = expr::parse(&self.expr, self.language, &self.var_names, &self.config)?;
            debug!("parsed {} expression {:?}", self.language, self.expr);
            Ok(node)
        })
    }

    /// Evaluate with values bound to the declared variables by position.
    pub fn aeval(&self, values: &[f64]) -> Result<f64> {
        let ast = self.ast()?;
        if values.len() != self.var_names.len() {
            return Err(ParsevalError::ArityMismatch {
                expected: self.var_names.len(),
                got: values.len(),
            });
        }
        let env: Bindings<'_> = self
            .var_names
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect();
        evaluate(ast, &env)
    }

    /// Evaluate with values bound by name.
    ///
    /// Every key must be a declared variable and every declared variable
    /// must be bound.
    pub fn keval<K, I>(&self, values: I) -> Result<f64>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let ast = self.ast()?;
        let mut env = Bindings::new();
        for (key, value) in values {
            let name = self
                .var_names
                .iter()
                .find(|n| n.as_str() == key.as_ref())
                .ok_or_else(|| ParsevalError::unknown_variable(key.as_ref()))?;
            env.insert(name.as_str(), value);
        }
        if let Some(missing) = self.var_names.iter().find(|n| !env.contains_key(n.as_str())) {
            return Err(ParsevalError::MissingVariable {
                name: missing.clone(),
            });
        }
        evaluate(ast, &env)
    }

    /// Render the expression in `target`.
    pub fn generate(&self, target: Dialect) -> Result<String> {
        let ast = self.ast()?;
        Ok(Generator::new(self.language, target, &self.config).generate(ast))
    }

    /// Render the expression as SPICE text.
    pub fn generate_spice(&self) -> Result<String> {
        self.generate(Dialect::Spice)
    }

    /// Render the expression as COMSOL text.
    pub fn generate_comsol(&self) -> Result<String> {
        self.generate(Dialect::Comsol)
    }
}
