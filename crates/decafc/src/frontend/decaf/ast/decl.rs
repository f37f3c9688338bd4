//! Declaration AST nodes

use super::{ScalarType, Stmt};
use crate::common::Span;

/// Class-level field declaration: `int a, b[10];`
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub ty: ScalarType,
    pub names: Vec<FieldName>,
    pub span: Span,
}

impl FieldDecl {
    pub fn new(ty: ScalarType, names: Vec<FieldName>, span: Span) -> Self {
        Self { ty, names, span }
    }
}

/// One declarator of a field declaration
#[derive(Debug, Clone)]
pub struct FieldName {
    pub name: String,
    /// Size token text for array fields, unvalidated
    pub array_size: Option<String>,
    pub span: Span,
}

impl FieldName {
    pub fn scalar(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), array_size: None, span }
    }

    pub fn array(name: impl Into<String>, size: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), array_size: Some(size.into()), span }
    }
}

/// Method declaration; `return_type` is `None` for `void`
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: Option<ScalarType>,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

impl MethodDecl {
    pub fn new(
        name: impl Into<String>,
        return_type: Option<ScalarType>,
        params: Vec<Param>,
        body: Block,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
            body,
            span,
        }
    }
}

/// Method parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: ScalarType,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ScalarType, span: Span) -> Self {
        Self { name: name.into(), ty, span }
    }
}

/// Local variable declaration at the head of a block: `int i, j;`
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub ty: ScalarType,
    pub names: Vec<(String, Span)>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(ty: ScalarType, names: Vec<(String, Span)>, span: Span) -> Self {
        Self { ty, names, span }
    }
}

/// Block: variable declarations followed by statements
#[derive(Debug, Clone)]
pub struct Block {
    pub var_decls: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(var_decls: Vec<VarDecl>, statements: Vec<Stmt>, span: Span) -> Self {
        Self { var_decls, statements, span }
    }
}
