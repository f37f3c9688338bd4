//! Abstract Syntax Tree definitions
//!
//! Every node carries a [`Span`](crate::common::Span) whose `line` is the
//! source line of the node's first token.

mod types;
mod expr;
mod stmt;
mod decl;

pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use decl::*;

use crate::common::Span;

/// A complete Decaf program: `class Program { fields methods }`
#[derive(Debug, Clone)]
pub struct Program {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
    /// Line of the closing brace
    pub end_line: usize,
}

impl Program {
    pub fn new(
        name: String,
        fields: Vec<FieldDecl>,
        methods: Vec<MethodDecl>,
        span: Span,
        end_line: usize,
    ) -> Self {
        Self { name, fields, methods, span, end_line }
    }
}
