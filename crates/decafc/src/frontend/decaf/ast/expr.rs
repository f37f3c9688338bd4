//! Expression AST nodes

use crate::common::Span;
use std::fmt;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Variable reference: x, a[i]
    Location(Location),

    /// Method call or callout
    MethodCall(MethodCall),

    /// Literal: 42, 'c', true
    Literal(Literal),

    /// Unary operation: -x, !flag
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Binary operation: a + b, x && y
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Parenthesized expression: (e)
    Paren(Box<Expr>),
}

/// Reference to a declared variable, optionally indexed
#[derive(Debug, Clone)]
pub struct Location {
    pub name: String,
    pub index: Option<Box<Expr>>,
    pub span: Span,
}

impl Location {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), index: None, span }
    }

    pub fn indexed(name: impl Into<String>, index: Expr, span: Span) -> Self {
        Self {
            name: name.into(),
            index: Some(Box::new(index)),
            span,
        }
    }
}

/// Literal values; integer and char literals keep their source text
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(String),
    Char(String),
    Bool(bool),
}

/// Method call node
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub kind: CallKind,
    pub span: Span,
}

impl MethodCall {
    pub fn new(kind: CallKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum CallKind {
    /// Call of a declared method: foo(a, b)
    Method { name: String, args: Vec<Expr> },

    /// External call: callout("printf", "%d", x)
    Callout { name: String, args: Vec<CalloutArg> },
}

#[derive(Debug, Clone)]
pub enum CalloutArg {
    Expr(Expr),
    String(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

/// Operator families with distinct typing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCategory {
    /// `*` `/` `%`
    StrongArith,
    /// `+` `-`
    WeakArith,
    /// `<` `<=` `>` `>=`
    Relational,
    /// `&&` `||`
    Conditional,
    /// `==` `!=`
    Equality,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn category(&self) -> OpCategory {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => OpCategory::StrongArith,
            BinaryOp::Add | BinaryOp::Sub => OpCategory::WeakArith,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => OpCategory::Relational,
            BinaryOp::And | BinaryOp::Or => OpCategory::Conditional,
            BinaryOp::Eq | BinaryOp::Ne => OpCategory::Equality,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -x
    Not, // !x
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

// Display renders the token text with no separating whitespace, which is
// how operands are quoted in diagnostics.

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Location(loc) => write!(f, "{}", loc),
            ExprKind::MethodCall(call) => write!(f, "{}", call),
            ExprKind::Literal(lit) => write!(f, "{}", lit),
            ExprKind::Unary { op, operand } => write!(f, "{}{}", op.as_str(), operand),
            ExprKind::Binary { op, left, right } => {
                write!(f, "{}{}{}", left, op.as_str(), right)
            }
            ExprKind::Paren(inner) => write!(f, "({})", inner),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(text) | Literal::Char(text) => f.write_str(text),
            Literal::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl fmt::Display for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CallKind::Method { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            CallKind::Callout { name, args } => {
                write!(f, "callout({}", name)?;
                for arg in args {
                    match arg {
                        CalloutArg::Expr(e) => write!(f, ",{}", e)?,
                        CalloutArg::String(s) => write!(f, ",{}", s)?,
                    }
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(text: &str) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Int(text.to_string())), Span::default())
    }

    fn var(name: &str) -> Expr {
        Expr::new(ExprKind::Location(Location::new(name, Span::default())), Span::default())
    }

    #[test]
    fn test_display_matches_token_text() {
        let sum = Expr::new(
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(var("a")),
                right: Box::new(int("1")),
            },
            Span::default(),
        );
        let neg = Expr::new(
            ExprKind::Unary { op: UnaryOp::Neg, operand: Box::new(Expr::new(ExprKind::Paren(Box::new(sum)), Span::default())) },
            Span::default(),
        );
        assert_eq!(neg.to_string(), "-(a+1)");

        let indexed = Location::indexed("arr", var("i"), Span::default());
        assert_eq!(indexed.to_string(), "arr[i]");

        let call = MethodCall::new(
            CallKind::Method { name: "f".into(), args: vec![int("1"), var("x")] },
            Span::default(),
        );
        assert_eq!(call.to_string(), "f(1,x)");
    }

    #[test]
    fn test_operator_categories() {
        assert_eq!(BinaryOp::Mod.category(), OpCategory::StrongArith);
        assert_eq!(BinaryOp::Sub.category(), OpCategory::WeakArith);
        assert_eq!(BinaryOp::Ge.category(), OpCategory::Relational);
        assert_eq!(BinaryOp::Or.category(), OpCategory::Conditional);
        assert_eq!(BinaryOp::Ne.category(), OpCategory::Equality);
    }
}
