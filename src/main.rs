//! Parseval - SPICE/COMSOL expression translator
//!
//! # Usage
//!
//! ```bash
//! parseval convert --from spice --vars temp "99.9-0.222*temp+0.444e-5*temp**2"
//! parseval eval --from comsol --vars T --values 298.15 "(33/(0.33+1.33e-3*(T/1[K])))"
//! parseval eval --from spice --vars temp,x --set temp=25 --set x=100 "temp*x"
//! parseval ast --from comsol --vars temp "((T-0[degC])/1[K])^2"
//! ```

use clap::{Args, Parser, Subcommand};
use parseval::{error::Result, Dialect, ExprConfig, ExprParser};

/// Translate and evaluate SPICE and COMSOL expressions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the expression in another dialect
    Convert {
        #[command(flatten)]
        source: Source,

        /// Target dialect (defaults to the other one)
        #[arg(long, value_enum)]
        to: Option<Dialect>,
    },
    /// Evaluate the expression
    Eval {
        #[command(flatten)]
        source: Source,

        /// Values bound to --vars by position
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "set")]
        values: Vec<f64>,

        /// Values bound by name, as name=value
        #[arg(long, value_parser = parse_binding)]
        set: Vec<(String, f64)>,
    },
    /// Print the parsed expression tree
    Ast {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Args, Debug)]
struct Source {
    /// The expression text
    #[arg(value_name = "EXPR")]
    expr: String,

    /// Dialect the expression is written in
    #[arg(long, value_enum)]
    from: Dialect,

    /// Declared variable names, in positional order
    #[arg(long, value_delimiter = ',')]
    vars: Vec<String>,

    /// Extra temperature alias, as celsius=kelvin
    #[arg(long, value_parser = parse_alias)]
    alias: Vec<(String, String)>,
}

impl Source {
    fn into_parser(self) -> Result<ExprParser> {
        let config = self
            .alias
            .into_iter()
            .fold(ExprConfig::default(), |config, (celsius, kelvin)| {
                config.with_temperature_alias(celsius, kelvin)
            });
        ExprParser::with_config(self.expr, self.vars, self.from, config)
    }
}

fn parse_binding(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn parse_alias(s: &str) -> std::result::Result<(String, String), String> {
    let (celsius, kelvin) = s
        .split_once('=')
        .ok_or_else(|| format!("expected celsius=kelvin, got '{}'", s))?;
    Ok((celsius.trim().to_string(), kelvin.trim().to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert { source, to } => {
            let target = to.unwrap_or(source.from.other());
            let parser = source.into_parser()?;
            println!("{}", parser.generate(target)?);
        }
        Command::Eval { source, values, set } => {
            let parser = source.into_parser()?;
            let result = if set.is_empty() {
                parser.aeval(&values)?
            } else {
                parser.keval(set)?
            };
            println!("{}", result);
        }
        Command::Ast { source } => {
            let parser = source.into_parser()?;
            println!("{:#?}", parser.ast()?);
        }
    }

    Ok(())
}
