//! Rendering expression trees back into SPICE or COMSOL text.
//!
//! Parentheses are inserted only where the tree's shape would otherwise
//! re-parse differently, so generating into the dialect a tree was parsed
//! from reproduces the same tree.

use log::trace;

use crate::config::ExprConfig;
use crate::expr::units::{self, Unit};
use crate::expr::{BinOp, Dialect, Node, UnaryOp, PREC_ATOM, PREC_UNARY};
use crate::ZERO_CELSIUS;

/// Writes a tree in a target dialect.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    origin: Dialect,
    target: Dialect,
    config: &'a ExprConfig,
}

impl<'a> Generator<'a> {
    /// Create a generator for a tree parsed from `origin`.
    pub fn new(origin: Dialect, target: Dialect, config: &'a ExprConfig) -> Self {
        Self {
            origin,
            target,
            config,
        }
    }

    /// Render `node` as text.
    pub fn generate(&self, node: &Node) -> String {
        let mut out = String::new();
        self.write(node, &mut out);
        trace!("generated {} from {}: {}", self.target, self.origin, out);
        out
    }

    fn write(&self, node: &Node, out: &mut String) {
        if let Some(kelvin) = self.absolute_kelvin(node) {
            out.push_str(&units::absolute_temperature_idiom(kelvin));
            return;
        }

        match node {
            Node::Literal { value, text, unit } => self.write_literal(*value, text.as_deref(), *unit, out),
            Node::VarRef(name) => {
                // Celsius-space variables from SPICE carry units in COMSOL
                let kelvin = match (self.origin, self.target) {
                    (Dialect::Spice, Dialect::Comsol) => self.config.kelvin_name(name),
                    _ => None,
                };
                match kelvin {
                    Some(kelvin) => out.push_str(&units::temperature_idiom(kelvin)),
                    None => out.push_str(name),
                }
            }
            Node::TempVar(name) => match self.target {
                Dialect::Comsol => {
                    let kelvin = self.config.kelvin_name(name).unwrap_or(name.as_str());
                    out.push_str(&units::temperature_idiom(kelvin));
                }
                Dialect::Spice => out.push_str(name),
            },
            Node::AbsTemp(name) => match self.target {
                Dialect::Comsol => {
                    let kelvin = self.config.kelvin_name(name).unwrap_or(name.as_str());
                    out.push_str(&units::absolute_temperature_idiom(kelvin));
                }
                Dialect::Spice => out.push_str(&format!("({}+{})", name, ZERO_CELSIUS)),
            },
            Node::UnaryOp {
                op: UnaryOp::Negate,
                operand,
            } => {
                out.push('-');
                self.write_child(operand, self.precedence(operand) < PREC_UNARY, out);
            }
            Node::BinOp { op, left, right } => {
                let prec = op.precedence();
                let right_assoc = op.is_right_associative();

                let left_prec = self.precedence(left);
                self.write_child(left, left_prec < prec || (left_prec == prec && right_assoc), out);

                out.push_str(op.symbol(self.target));

                let right_prec = self.precedence(right);
                self.write_child(right, right_prec < prec || (right_prec == prec && !right_assoc), out);
            }
        }
    }

    /// Kelvin name for a SPICE `temp+273.15` written into COMSOL as `(T/1[K])`.
    fn absolute_kelvin(&self, node: &Node) -> Option<&'a str> {
        if (self.origin, self.target) != (Dialect::Spice, Dialect::Comsol) {
            return None;
        }
        match node {
            Node::BinOp {
                op: BinOp::Add,
                left,
                right,
            } => match (left.as_ref(), right.as_ref()) {
                (Node::VarRef(name), Node::Literal { value, unit: None, .. }) if *value == ZERO_CELSIUS => {
                    self.config.kelvin_name(name)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn precedence(&self, node: &Node) -> u8 {
        if self.absolute_kelvin(node).is_some() {
            PREC_ATOM
        } else {
            node.precedence()
        }
    }

    fn write_child(&self, node: &Node, parenthesize: bool, out: &mut String) {
        if parenthesize {
            out.push('(');
            self.write(node, out);
            out.push(')');
        } else {
            self.write(node, out);
        }
    }

    fn write_literal(&self, value: f64, text: Option<&str>, unit: Option<Unit>, out: &mut String) {
        match (unit, self.target) {
            (None, _) => match text {
                Some(text) => out.push_str(text),
                None => out.push_str(&format_number(value)),
            },
            (Some(unit), Dialect::Comsol) => {
                match text {
                    Some(text) => out.push_str(text),
                    None => out.push_str(&format_number(unit.from_kelvin(value))),
                }
                out.push('[');
                out.push_str(unit.symbol());
                out.push(']');
            }
            // SPICE has no units; emit the Kelvin-normalized value
            (Some(_), Dialect::Spice) if value.is_finite() => out.push_str(&format_number(value)),
            // Overflowed in the source; keep the written number and shift it
            (Some(unit), Dialect::Spice) => match (text, unit) {
                (Some(text), Unit::Celsius) => out.push_str(&format!("({}+{})", text, ZERO_CELSIUS)),
                (Some(text), Unit::Kelvin) => out.push_str(text),
                (None, _) => out.push_str(&format_number(value)),
            },
        }
    }
}

/// Shortest text that reads back as exactly `value`.
///
/// Very large and very small magnitudes use exponent notation. Infinities
/// are written as an overflowing literal, which reads back as infinite.
fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "(1e999-1e999)".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "1e999" } else { "-1e999" };
        return text.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Render `node`, parsed from `origin`, in the `target` dialect.
pub fn generate(node: &Node, origin: Dialect, target: Dialect, config: &ExprConfig) -> String {
    Generator::new(origin, target, config).generate(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn round_trip(input: &str, dialect: Dialect, vars: &[&str]) -> String {
        let config = ExprConfig::default();
        let vars = names(vars);
        let ast = parse(input, dialect, &vars, &config).unwrap();
        let text = generate(&ast, dialect, dialect, &config);
        let reparsed = parse(&text, dialect, &vars, &config).unwrap();
        assert_eq!(ast, reparsed, "round trip of {:?} via {:?}", input, text);
        text
    }

    #[test]
    fn test_spice_pretty_print() {
        assert_eq!(
            round_trip("( -0.0036 * (temp+273.15)**2 + 4.6305*(temp+273.15) - 405.38 ) * 3210", Dialect::Spice, &["temp"]),
            "(-0.0036*(temp+273.15)**2+4.6305*(temp+273.15)-405.38)*3210"
        );
        assert_eq!(round_trip("6e6*(temp+273.15)**(-1.702)", Dialect::Spice, &["temp"]), "6e6*(temp+273.15)**-1.702");
        assert_eq!(round_trip("a-(b-c)", Dialect::Spice, &["a", "b", "c"]), "a-(b-c)");
        assert_eq!(round_trip("(a-b)-c", Dialect::Spice, &["a", "b", "c"]), "a-b-c");
        assert_eq!(round_trip("a/(b*c)", Dialect::Spice, &["a", "b", "c"]), "a/(b*c)");
        assert_eq!(round_trip("(a**b)**c", Dialect::Spice, &["a", "b", "c"]), "(a**b)**c");
        assert_eq!(round_trip("a**(b**c)", Dialect::Spice, &["a", "b", "c"]), "a**b**c");
        assert_eq!(round_trip("-(a+b)", Dialect::Spice, &["a", "b"]), "-(a+b)");
        assert_eq!(round_trip("(-a)**2", Dialect::Spice, &["a"]), "-a**2");
        assert_eq!(round_trip("--a", Dialect::Spice, &["a"]), "--a");
    }

    #[test]
    fn test_comsol_pretty_print() {
        assert_eq!(
            round_trip("(671+1.04*((T-0[degC])/1[K])-1.17e-3*((T-0[degC])/1[K])^2)", Dialect::Comsol, &["temp"]),
            "671+1.04*((T-0[degC])/1[K])-1.17e-3*((T-0[degC])/1[K])^2"
        );
        assert_eq!(round_trip("(T-0[degC])/1[K]", Dialect::Comsol, &["T"]), "T-0[degC]");
        assert_eq!(round_trip("T/1[K]", Dialect::Comsol, &["T"]), "T/1[K]");

        // Parenthesized divisors strip like bare ones
        assert_eq!(round_trip("(a+b)/(1[K])", Dialect::Comsol, &["a", "b"]), "a+b");
        assert_eq!(round_trip("(x)/(1[K])", Dialect::Comsol, &["x"]), "x");
        assert_eq!(
            round_trip("((T-0[degC]))/(1[K])", Dialect::Comsol, &["temp"]),
            "((T-0[degC])/1[K])"
        );

        assert_eq!(
            round_trip("(6e6*(T/1[K])^(-1.702))", Dialect::Comsol, &["temp"]),
            "6e6*(T/1[K])^-1.702"
        );
    }

    #[test]
    fn test_spice_to_comsol_idiom_synthesis() {
        let config = ExprConfig::default();
        let ast = parse("99.9-0.222*temp+0.444e-5*temp**2", Dialect::Spice, &names(&["temp"]), &config).unwrap();
        assert_eq!(
            generate(&ast, Dialect::Spice, Dialect::Comsol, &config),
            "99.9-0.222*((T-0[degC])/1[K])+0.444e-5*((T-0[degC])/1[K])^2"
        );
    }

    #[test]
    fn test_absolute_temperature_translation() {
        let config = ExprConfig::default();
        let vars = names(&["temp"]);

        let ast = parse("6e6*(temp+273.15)**(-1.702)", Dialect::Spice, &vars, &config).unwrap();
        assert_eq!(generate(&ast, Dialect::Spice, Dialect::Comsol, &config), "6e6*(T/1[K])^-1.702");

        let ast = parse("6e6*(T/1[K])^(-1.702)", Dialect::Comsol, &vars, &config).unwrap();
        assert_eq!(generate(&ast, Dialect::Comsol, Dialect::Spice, &config), "6e6*(temp+273.15)**-1.702");

        // Only `temp+273.15` itself is the idiom
        let ast = parse("273.15+temp", Dialect::Spice, &vars, &config).unwrap();
        assert_eq!(generate(&ast, Dialect::Spice, Dialect::Comsol, &config), "273.15+((T-0[degC])/1[K])");
        let ast = parse("temp+273.15-1", Dialect::Spice, &vars, &config).unwrap();
        assert_eq!(generate(&ast, Dialect::Spice, Dialect::Comsol, &config), "(T/1[K])-1");
    }

    #[test]
    fn test_variables_without_alias_stay_bare() {
        let config = ExprConfig::default();
        let ast = parse("x*temp", Dialect::Spice, &names(&["temp", "x"]), &config).unwrap();
        assert_eq!(
            generate(&ast, Dialect::Spice, Dialect::Comsol, &config),
            "x*((T-0[degC])/1[K])"
        );
    }

    #[test]
    fn test_comsol_to_spice() {
        let config = ExprConfig::default();
        let ast = parse("1.04*((T-0[degC])/1[K])^2", Dialect::Comsol, &names(&["temp"]), &config).unwrap();
        assert_eq!(generate(&ast, Dialect::Comsol, Dialect::Spice, &config), "1.04*temp**2");

        // Unit-adjusted literals lose their unit and keep their Kelvin value
        let ast = parse("(T-0[degC])/1[K]", Dialect::Comsol, &names(&["T"]), &config).unwrap();
        assert_eq!(generate(&ast, Dialect::Comsol, Dialect::Spice, &config), "T-273.15");
    }

    #[test]
    fn test_generated_literals() {
        let config = ExprConfig::default();
        let tree = Node::binary(BinOp::Sub, Node::var("a"), Node::number(-1.5));
        assert_eq!(generate(&tree, Dialect::Spice, Dialect::Spice, &config), "a--1.5");

        let tree = Node::binary(BinOp::Pow, Node::number(-2.0), Node::number(0.5));
        assert_eq!(generate(&tree, Dialect::Comsol, Dialect::Comsol, &config), "-2^0.5");

        let celsius = Node::Literal {
            value: 298.15,
            text: None,
            unit: Some(Unit::Celsius),
        };
        let text = generate(&celsius, Dialect::Comsol, Dialect::Comsol, &config);
        assert!(text.ends_with("[degC]"), "{}", text);
    }

    #[test]
    fn test_number_format() {
        assert_eq!(format_number(298.15), "298.15");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1e20), "1e20");
        assert_eq!(format_number(-2.5e-7), "-2.5e-7");
        assert_eq!(format_number(f64::INFINITY), "1e999");
        assert_eq!(format_number(f64::NEG_INFINITY), "-1e999");
    }

    #[test]
    fn test_overflowed_unit_literals_stay_valid() {
        let config = ExprConfig::default();
        let ast = parse("2*1e400[degC]", Dialect::Comsol, &[], &config).unwrap();
        let text = generate(&ast, Dialect::Comsol, Dialect::Spice, &config);
        assert_eq!(text, "2*(1e400+273.15)");
        assert!(parse(&text, Dialect::Spice, &[], &config).is_ok());

        let ast = parse("1e400[K]", Dialect::Comsol, &[], &config).unwrap();
        assert_eq!(generate(&ast, Dialect::Comsol, Dialect::Spice, &config), "1e400");

        let tree = Node::binary(BinOp::Mul, Node::number(f64::INFINITY), Node::number(1e-9));
        let text = generate(&tree, Dialect::Spice, Dialect::Spice, &config);
        assert_eq!(text, "1e999*1e-9");
        assert!(parse(&text, Dialect::Spice, &[], &config).is_ok());
    }
}
