//! Statement AST nodes

use super::{Block, Expr, Location, MethodCall};
use crate::common::Span;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Assignment: x = e, a[i] += e
    Assign {
        target: Location,
        op: AssignOp,
        value: Expr,
    },

    /// Method call statement: foo(a);
    MethodCall(MethodCall),

    /// If statement: if (cond) block [else block]
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },

    /// For loop: for i = start, end block
    For {
        var: String,
        var_span: Span,
        start: Expr,
        end: Expr,
        body: Block,
    },

    /// Return statement: return [expr];
    Return(Option<Expr>),

    /// Break statement
    Break,

    /// Continue statement
    Continue,

    /// Nested block
    Block(Block),
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        }
    }
}
