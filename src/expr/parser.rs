//! Recursive-descent parser for SPICE and COMSOL expressions.
//!
//! One parser serves both dialects; the [`Dialect`] decides the lexer's
//! operator spelling and whether unit brackets are accepted.

use super::ast::{BinOp, Node};
use super::lexer::{Lexer, Operator, Token, TokenKind};
use super::units::{self, Unit};
use super::Dialect;
use crate::config::ExprConfig;
use crate::error::{ParsevalError, Result};

/// How an operand ends, used to spot the `(...)/1[K]` unit strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Plain,
    /// A parenthesized group
    Group,
    /// A product or quotient whose last factor is a parenthesized group
    EndsWithGroup,
}

struct Operand {
    node: Node,
    shape: Shape,
}

impl Operand {
    fn plain(node: Node) -> Self {
        Self {
            node,
            shape: Shape::Plain,
        }
    }
}

/// Parser for a single expression.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    dialect: Dialect,
    var_names: &'a [String],
    config: &'a ExprConfig,
}

impl<'a> Parser<'a> {
    /// Create a new parser, reading the first token.
    pub fn new(input: &'a str, dialect: Dialect, var_names: &'a [String], config: &'a ExprConfig) -> Result<Self> {
        let mut lexer = Lexer::new(input, dialect);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            dialect,
            var_names,
            config,
        })
    }

    /// Parse the complete input as one expression.
    pub fn parse(&mut self) -> Result<Node> {
        let node = self.parse_expr()?.node;

        match &self.current.kind {
            TokenKind::End => {}
            TokenKind::LBracket | TokenKind::RBracket => {
                return Err(ParsevalError::unsupported_unit(
                    self.current.kind.describe(),
                    format!("unit bracket at column {} does not follow a number", self.current.column),
                ));
            }
            other => {
                return Err(ParsevalError::syntax(
                    self.current.column,
                    format!("unexpected {} after complete expression", other.describe()),
                ));
            }
        }

        // Kelvin-space names are only legal inside a collapsed idiom
        let mut unknown = None;
        node.for_each_variable(&mut |name| {
            if unknown.is_none() && !self.is_declared(name) {
                unknown = Some(name.to_string());
            }
        });
        match unknown {
            Some(name) => Err(ParsevalError::unknown_variable(name)),
            None => Ok(node),
        }
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn is_operator(&self, op: Operator) -> bool {
        self.current.kind == TokenKind::Operator(op)
    }

    fn is_declared(&self, name: &str) -> bool {
        self.var_names.iter().any(|n| n == name)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            self.advance()
        } else {
            Err(ParsevalError::syntax(
                self.current.column,
                format!("expected {}, got {}", kind.describe(), self.current.kind.describe()),
            ))
        }
    }

    fn parse_expr(&mut self) -> Result<Operand> {
        let mut left = self.parse_term()?;
        loop {
            let op = if self.is_operator(Operator::Plus) {
                BinOp::Add
            } else if self.is_operator(Operator::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            self.advance()?;
            let right = self.parse_term()?;
            left = Operand::plain(Node::binary(op, left.node, right.node));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Operand> {
        let mut left = self.parse_factor()?;
        loop {
            let op = if self.is_operator(Operator::Star) {
                BinOp::Mul
            } else if self.is_operator(Operator::Slash) {
                BinOp::Div
            } else {
                break;
            };
            self.advance()?;
            let right = self.parse_factor()?;

            // `1[K]` and `(1[K])` divide away the unit the same way
            if op == BinOp::Div && self.dialect == Dialect::Comsol && units::is_unit_divisor(&right.node) {
                if left.shape != Shape::Plain {
                    left = Operand::plain(self.strip_unit_divisor(left)?);
                    continue;
                }
                if let Node::VarRef(name) = &left.node {
                    if let Some(node) = units::absolute_temperature(name, self.var_names, self.config) {
                        left = Operand::plain(node);
                        continue;
                    }
                }
            }

            let shape = if right.shape == Shape::Plain {
                Shape::Plain
            } else {
                Shape::EndsWithGroup
            };
            left = Operand {
                node: Node::binary(op, left.node, right.node),
                shape,
            };
        }
        Ok(left)
    }

    /// Drop a `/1[K]` divisor from the trailing group of `operand`,
    /// collapsing the group's interior when it is the temperature idiom.
    fn strip_unit_divisor(&self, operand: Operand) -> Result<Node> {
        match (operand.shape, operand.node) {
            (Shape::Group, node) => units::collapse_temperature_idiom(node, self.var_names, self.config),
            (Shape::EndsWithGroup, Node::BinOp { op, left, right }) => Ok(Node::BinOp {
                op,
                left,
                right: Box::new(units::collapse_temperature_idiom(*right, self.var_names, self.config)?),
            }),
            (_, node) => Ok(node),
        }
    }

    fn parse_factor(&mut self) -> Result<Operand> {
        let base = self.parse_unary()?;
        if self.is_operator(Operator::Power) {
            self.advance()?;
            let exponent = self.parse_factor()?;
            return Ok(Operand::plain(Node::binary(BinOp::Pow, base.node, exponent.node)));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Operand> {
        if self.is_operator(Operator::Minus) {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Operand::plain(Node::negate(operand.node)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Operand> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Number { text, value } => {
                if self.current.kind == TokenKind::LBracket {
                    let unit = self.parse_unit()?;
                    return Ok(Operand::plain(units::unit_literal(text, value, unit)));
                }
                Ok(Operand::plain(Node::literal(value, text)))
            }
            TokenKind::Identifier(name) => {
                self.check_identifier(&name)?;
                if self.current.kind == TokenKind::LBracket {
                    return Err(ParsevalError::unsupported_unit(
                        self.unit_text()?,
                        format!("unit attached to variable '{}'", name),
                    ));
                }
                Ok(Operand::plain(Node::VarRef(name)))
            }
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                if self.current.kind == TokenKind::LBracket {
                    return Err(ParsevalError::unsupported_unit(
                        self.unit_text()?,
                        "unit attached to a parenthesized expression",
                    ));
                }
                Ok(Operand {
                    node: inner.node,
                    shape: Shape::Group,
                })
            }
            kind @ (TokenKind::LBracket | TokenKind::RBracket) => Err(ParsevalError::unsupported_unit(
                kind.describe(),
                format!("unit bracket at column {} does not follow a number", token.column),
            )),
            other => Err(ParsevalError::syntax(
                token.column,
                format!("expected number, variable or '(', got {}", other.describe()),
            )),
        }
    }

    /// Identifiers must be declared; COMSOL additionally admits the
    /// Kelvin-space alias of a declared variable, which must end up inside
    /// a collapsed idiom.
    fn check_identifier(&self, name: &str) -> Result<()> {
        if self.is_declared(name) {
            return Ok(());
        }
        if self.dialect == Dialect::Comsol {
            if let Some(celsius) = self.config.celsius_name(name) {
                if self.is_declared(celsius) {
                    return Ok(());
                }
            }
        }
        Err(ParsevalError::unknown_variable(name))
    }

    /// Consume `[ ... ]` and return its contents as written.
    fn unit_text(&mut self) -> Result<String> {
        let open = self.expect(TokenKind::LBracket)?;
        let mut text = String::new();
        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::RBracket => return Ok(text),
                TokenKind::End => {
                    return Err(ParsevalError::syntax(
                        open.column,
                        "unterminated unit bracket",
                    ))
                }
                other => text.push_str(&self.lexeme(&other)),
            }
        }
    }

    fn parse_unit(&mut self) -> Result<Unit> {
        let text = self.unit_text()?;
        Unit::from_symbol(&text)
            .ok_or_else(|| ParsevalError::unsupported_unit(text.clone(), "only [K] and [degC] are supported"))
    }

    fn lexeme(&self, kind: &TokenKind) -> String {
        match kind {
            TokenKind::Number { text, .. } => text.clone(),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Operator(Operator::Plus) => "+".to_string(),
            TokenKind::Operator(Operator::Minus) => "-".to_string(),
            TokenKind::Operator(Operator::Star) => "*".to_string(),
            TokenKind::Operator(Operator::Slash) => "/".to_string(),
            TokenKind::Operator(Operator::Power) => self.dialect.power_symbol().to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::End => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn spice(input: &str, vars: &[&str]) -> Result<Node> {
        parse(input, Dialect::Spice, &names(vars), &ExprConfig::default())
    }

    fn comsol(input: &str, vars: &[&str]) -> Result<Node> {
        parse(input, Dialect::Comsol, &names(vars), &ExprConfig::default())
    }

    fn lit(text: &str) -> Node {
        Node::literal(text.parse().unwrap(), text)
    }

    #[test]
    fn test_precedence_and_associativity() {
        let ast = spice("1+2*temp-3", &["temp"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(
                BinOp::Sub,
                Node::binary(
                    BinOp::Add,
                    lit("1"),
                    Node::binary(BinOp::Mul, lit("2"), Node::var("temp"))
                ),
                lit("3")
            )
        );

        let ast = spice("a/b/c", &["a", "b", "c"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(
                BinOp::Div,
                Node::binary(BinOp::Div, Node::var("a"), Node::var("b")),
                Node::var("c")
            )
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        let ast = spice("a**b**c", &["a", "b", "c"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(
                BinOp::Pow,
                Node::var("a"),
                Node::binary(BinOp::Pow, Node::var("b"), Node::var("c"))
            )
        );
    }

    #[test]
    fn test_unary_binds_tighter_than_power() {
        let ast = spice("-x**2", &["x"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(BinOp::Pow, Node::negate(Node::var("x")), lit("2"))
        );

        let ast = spice("x**-2", &["x"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(BinOp::Pow, Node::var("x"), Node::negate(lit("2")))
        );
    }

    #[test]
    fn test_spice_errors() {
        assert_eq!(spice("temp+y", &["temp"]), Err(ParsevalError::unknown_variable("y")));
        assert!(matches!(
            spice("temp temp", &["temp"]),
            Err(ParsevalError::SyntaxError { column: 6, .. })
        ));
        assert!(matches!(spice("(temp", &["temp"]), Err(ParsevalError::SyntaxError { .. })));
        assert!(matches!(spice("", &[]), Err(ParsevalError::SyntaxError { .. })));
        assert!(matches!(spice("2*", &[]), Err(ParsevalError::SyntaxError { .. })));
        // SPICE never recognizes Kelvin aliases
        assert_eq!(spice("T", &["temp"]), Err(ParsevalError::unknown_variable("T")));
    }

    #[test]
    fn test_comsol_unit_literals() {
        let ast = comsol("0[degC]", &[]).unwrap();
        assert_eq!(
            ast,
            Node::Literal {
                value: 273.15,
                text: Some("0".into()),
                unit: Some(Unit::Celsius)
            }
        );

        let ast = comsol("2 [ K ]", &[]).unwrap();
        assert_eq!(
            ast,
            Node::Literal {
                value: 2.0,
                text: Some("2".into()),
                unit: Some(Unit::Kelvin)
            }
        );
    }

    #[test]
    fn test_comsol_idiom_collapses() {
        let expected = Node::binary(BinOp::Mul, lit("0.222"), Node::TempVar("temp".into()));
        assert_eq!(comsol("0.222*((T-0[degC])/1[K])", &["temp"]).unwrap(), expected);
        assert_eq!(comsol("0.222 * ( ( T - 0 [degC] ) / 1 [K] )", &["temp"]).unwrap(), expected);
        assert_eq!(comsol("0.222*(((T-0[degC])))/1[K]", &["temp"]).unwrap(), expected);
        assert_eq!(comsol("(T-0[degC])/1[K]", &["temp"]).unwrap(), Node::TempVar("temp".into()));
    }

    #[test]
    fn test_comsol_idiom_with_declared_kelvin_variable() {
        let ast = comsol("(T-0[degC])/1[K]", &["T"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(
                BinOp::Sub,
                Node::var("T"),
                Node::Literal {
                    value: 273.15,
                    text: Some("0".into()),
                    unit: Some(Unit::Celsius)
                }
            )
        );
    }

    #[test]
    fn test_comsol_unit_divisor_without_idiom() {
        let ast = comsol("(T+1)/1[K]", &["T"]).unwrap();
        assert_eq!(ast, Node::binary(BinOp::Add, Node::var("T"), lit("1")));

        // A bare identifier is not a group, the divisor stays
        let ast = comsol("T/1[K]", &["T"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(
                BinOp::Div,
                Node::var("T"),
                Node::Literal {
                    value: 1.0,
                    text: Some("1".into()),
                    unit: Some(Unit::Kelvin)
                }
            )
        );
    }

    #[test]
    fn test_comsol_unit_divisor_in_parentheses() {
        let ast = comsol("(a+b)/(1[K])", &["a", "b"]).unwrap();
        assert_eq!(ast, Node::binary(BinOp::Add, Node::var("a"), Node::var("b")));
        assert_eq!(comsol("((T-0[degC]))/(1[K])", &["temp"]).unwrap(), Node::TempVar("temp".into()));
    }

    #[test]
    fn test_comsol_absolute_temperature() {
        assert_eq!(comsol("(T/1[K])", &["temp"]).unwrap(), Node::AbsTemp("temp".into()));
        assert_eq!(comsol("T/(1[K])", &["temp"]).unwrap(), Node::AbsTemp("temp".into()));

        let ast = comsol("6e6*(T/1[K])^(-1.702)", &["temp"]).unwrap();
        assert_eq!(
            ast,
            Node::binary(
                BinOp::Mul,
                lit("6e6"),
                Node::binary(BinOp::Pow, Node::AbsTemp("temp".into()), Node::negate(lit("1.702")))
            )
        );

        // Only a bare alias divided by 1[K] is the idiom
        assert_eq!(comsol("T/2[K]", &["temp"]), Err(ParsevalError::unknown_variable("T")));
        assert_eq!(comsol("(T/1[K])+T", &["temp"]), Err(ParsevalError::unknown_variable("T")));
    }

    #[test]
    fn test_comsol_alias_outside_idiom_is_unknown() {
        assert_eq!(comsol("T+1", &["temp"]), Err(ParsevalError::unknown_variable("T")));
        assert_eq!(
            comsol("(T-1[degC])/1[K]", &["temp"]),
            Err(ParsevalError::unknown_variable("T"))
        );
        assert_eq!(
            comsol("(Tx-0[degC])/1[K]", &["temp"]),
            Err(ParsevalError::unknown_variable("Tx"))
        );
    }

    #[test]
    fn test_comsol_unsupported_units() {
        assert!(matches!(
            comsol("1[degF]", &[]),
            Err(ParsevalError::UnsupportedUnitExpression { ref unit, .. }) if unit == "degF"
        ));
        assert!(matches!(
            comsol("2[m^2]", &[]),
            Err(ParsevalError::UnsupportedUnitExpression { ref unit, .. }) if unit == "m^2"
        ));
        assert!(matches!(
            comsol("T[K]", &["T"]),
            Err(ParsevalError::UnsupportedUnitExpression { .. })
        ));
        assert!(matches!(
            comsol("(T+1)[K]", &["T"]),
            Err(ParsevalError::UnsupportedUnitExpression { .. })
        ));
        assert!(matches!(
            comsol("[K]", &[]),
            Err(ParsevalError::UnsupportedUnitExpression { .. })
        ));
        assert!(matches!(comsol("1[K", &[]), Err(ParsevalError::SyntaxError { .. })));
    }

    #[test]
    fn test_comsol_power_spelling() {
        let ast = comsol("T^2", &["T"]).unwrap();
        assert_eq!(ast, Node::binary(BinOp::Pow, Node::var("T"), lit("2")));
        assert!(matches!(comsol("T**2", &["T"]), Err(ParsevalError::SyntaxError { .. })));
    }
}
