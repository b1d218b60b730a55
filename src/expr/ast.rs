//! Dialect-neutral abstract syntax tree.

use super::units::Unit;
use super::Dialect;

/// An expression tree shared by both parsers, the evaluator and the
/// generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A numeric literal.
    ///
    /// `value` is already Kelvin-normalized when `unit` is present.
    /// `text` is the literal as written, kept for faithful re-emission.
    Literal {
        value: f64,
        text: Option<String>,
        unit: Option<Unit>,
    },
    /// A reference to a declared variable
    VarRef(String),
    /// A unary operation
    UnaryOp { op: UnaryOp, operand: Box<Node> },
    /// A binary operation
    BinOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A Celsius-space temperature variable written through the COMSOL
    /// Kelvin idiom. Evaluates exactly like [`Node::VarRef`].
    TempVar(String),
    /// The absolute temperature of a Celsius-space variable, written
    /// `(T/1[K])` in COMSOL and `(temp+273.15)` in SPICE. Evaluates to the
    /// binding plus 273.15.
    AbsTemp(String),
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation
    Negate,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Multiplication
    Mul,
    /// Division
    Div,
    /// Real exponentiation
    Pow,
}

/// Binding strength of a node when printed; atoms bind tightest.
pub const PREC_ATOM: u8 = 5;
pub const PREC_UNARY: u8 = 4;

impl BinOp {
    /// Binding strength, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 3,
        }
    }

    /// Only exponentiation groups to the right.
    pub fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }

    /// Operator spelling in the given dialect.
    pub fn symbol(self, dialect: Dialect) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => dialect.power_symbol(),
        }
    }
}

impl Node {
    /// A literal with its source text.
    pub fn literal(value: f64, text: impl Into<String>) -> Self {
        Self::Literal {
            value,
            text: Some(text.into()),
            unit: None,
        }
    }

    /// A literal with no source text; rendered from its value.
    pub fn number(value: f64) -> Self {
        Self::Literal {
            value,
            text: None,
            unit: None,
        }
    }

    /// A variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Self::VarRef(name.into())
    }

    /// Negation of `operand`.
    pub fn negate(operand: Node) -> Self {
        Self::UnaryOp {
            op: UnaryOp::Negate,
            operand: Box::new(operand),
        }
    }

    /// A binary operation.
    pub fn binary(op: BinOp, left: Node, right: Node) -> Self {
        Self::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Printing precedence of this node.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Literal { value, .. } if value.is_sign_negative() => PREC_UNARY,
            Self::Literal { .. } | Self::VarRef(_) | Self::TempVar(_) | Self::AbsTemp(_) => PREC_ATOM,
            Self::UnaryOp { .. } => PREC_UNARY,
            Self::BinOp { op, .. } => op.precedence(),
        }
    }

    /// Visit every variable name referenced by the tree, in source order.
    pub fn for_each_variable<F: FnMut(&str)>(&self, f: &mut F) {
        match self {
            Self::Literal { .. } => {}
            Self::VarRef(name) | Self::TempVar(name) | Self::AbsTemp(name) => f(name),
            Self::UnaryOp { operand, .. } => operand.for_each_variable(f),
            Self::BinOp { left, right, .. } => {
                left.for_each_variable(f);
                right.for_each_variable(f);
            }
        }
    }

    /// All distinct variable names referenced by the tree, in source order.
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        self.for_each_variable(&mut |name| {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        });
        names
    }
}
