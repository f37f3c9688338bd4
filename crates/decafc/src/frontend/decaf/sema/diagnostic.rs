//! Semantic diagnostics
//!
//! Diagnostics are collected during the walk and never abort it. Their
//! messages follow the `Error line N: ...` format of the Decaf course tools.

use super::types::Type;
use crate::common::Span;
use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use std::fmt;
use thiserror::Error;

/// Which rule a type mismatch violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
    Assignment,
    StrongArith,
    WeakArith,
    Relational,
    Conditional,
    Equality,
    ArrayIndex,
    Condition,
    LoopVariable,
    LoopBound,
}

/// Every semantic defect the analyzer can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("Already exists: {name}, {ty}")]
    DuplicateDeclaration { name: String, ty: Type },

    #[error("Invalid array size on array named: {name}")]
    InvalidArraySize { name: String, size: String },

    /// An assignment target is reported without its name
    #[error("{}", describe_undeclared(.name, .target))]
    UndeclaredVariable { name: String, target: bool },

    #[error("Method not declared: {name}")]
    UndeclaredMethod { name: String },

    /// For operator checks `left`/`right` are operand source texts; for the
    /// other kinds they are type names or the offending text
    #[error("{}", describe_mismatch(.kind, .left, .right))]
    TypeMismatch {
        kind: MismatchKind,
        left: String,
        right: String,
    },

    #[error("No Main Method")]
    MissingMainMethod,

    #[error("'{name}' is not an array")]
    NotAnArray { name: String },

    #[error("'{name}' is not a method")]
    NotCallable { name: String },

    #[error("'{name}' is a method, not a variable")]
    NotAVariable { name: String },

    #[error("Method {method} expects {expected} arguments, found {found}")]
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("Argument {position} of {method} must be {expected}, found {found}")]
    ArgumentType {
        method: String,
        position: usize,
        expected: Type,
        found: Type,
    },

    #[error("Method {method} must return {expected}, found {found}")]
    ReturnMismatch {
        method: String,
        expected: Type,
        found: Type,
    },

    #[error("{keyword} statement outside of a loop")]
    InvalidControlFlow { keyword: &'static str },
}

fn describe_undeclared(name: &str, target: &bool) -> String {
    if *target {
        "Variable not declared".to_string()
    } else {
        format!("Variable not declared: {}", name)
    }
}

fn describe_mismatch(kind: &MismatchKind, left: &str, right: &str) -> String {
    match kind {
        MismatchKind::ArrayIndex => format!("Array index {} must be int, found {}", left, right),
        MismatchKind::Condition => format!("Condition must be boolean, found {}", left),
        MismatchKind::LoopVariable => format!("Loop variable {} must be int, found {}", left, right),
        MismatchKind::LoopBound => format!("Loop bound {} must be int, found {}", left, right),
        _ => format!(
            "Type mismatch, cannot perform operation on types {} and {}",
            left, right
        ),
    }
}

impl DiagnosticKind {
    /// Short category name, used as the rendered diagnostic title
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            DiagnosticKind::InvalidArraySize { .. } => "InvalidArraySize",
            DiagnosticKind::UndeclaredVariable { .. } => "UndeclaredVariable",
            DiagnosticKind::UndeclaredMethod { .. } => "UndeclaredMethod",
            DiagnosticKind::TypeMismatch { .. } => "TypeMismatch",
            DiagnosticKind::MissingMainMethod => "MissingMainMethod",
            DiagnosticKind::NotAnArray { .. } => "NotAnArray",
            DiagnosticKind::NotCallable { .. } => "NotCallable",
            DiagnosticKind::NotAVariable { .. } => "NotAVariable",
            DiagnosticKind::ArgumentCount { .. } => "ArgumentCount",
            DiagnosticKind::ArgumentType { .. } => "ArgumentType",
            DiagnosticKind::ReturnMismatch { .. } => "ReturnMismatch",
            DiagnosticKind::InvalidControlFlow { .. } => "InvalidControlFlow",
        }
    }
}

/// A reported semantic defect
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span) -> Self {
        Self {
            line: span.line,
            kind,
            span,
        }
    }

    /// Diagnostic pinned to a line with no usable byte range
    pub fn at_line(kind: DiagnosticKind, line: usize) -> Self {
        Self {
            line,
            kind,
            span: Span::new(0, 0, line),
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Convert for rendering with codespan-reporting
    pub fn to_codespan(&self, file_id: usize) -> CodespanDiagnostic<usize> {
        let diagnostic = CodespanDiagnostic::error()
            .with_message(self.kind.name())
            .with_code(format!("line {}", self.line));
        if self.span.end > self.span.start {
            diagnostic.with_labels(vec![
                Label::primary(file_id, self.span.start..self.span.end).with_message(self.message())
            ])
        } else {
            diagnostic.with_notes(vec![self.message()])
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error line {}: {}", self.line, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DiagnosticReporter;
    use codespan_reporting::term::termcolor::ColorChoice;

    #[test]
    fn test_messages() {
        let dup = Diagnostic::at_line(
            DiagnosticKind::DuplicateDeclaration { name: "x".into(), ty: Type::Int },
            3,
        );
        assert_eq!(dup.to_string(), "Error line 3: Already exists: x, int");

        let mismatch = Diagnostic::at_line(
            DiagnosticKind::TypeMismatch {
                kind: MismatchKind::StrongArith,
                left: "a".into(),
                right: "true".into(),
            },
            7,
        );
        assert_eq!(
            mismatch.message(),
            "Type mismatch, cannot perform operation on types a and true"
        );

        let cond = DiagnosticKind::TypeMismatch {
            kind: MismatchKind::Condition,
            left: "int".into(),
            right: "boolean".into(),
        };
        assert_eq!(cond.to_string(), "Condition must be boolean, found int");
        assert_eq!(DiagnosticKind::MissingMainMethod.to_string(), "No Main Method");

        let used = DiagnosticKind::UndeclaredVariable { name: "y".into(), target: false };
        assert_eq!(used.to_string(), "Variable not declared: y");
        let assigned = DiagnosticKind::UndeclaredVariable { name: "y".into(), target: true };
        assert_eq!(assigned.to_string(), "Variable not declared");
    }

    #[test]
    fn test_render_with_label() {
        let source = "class Program {\n  int x, x;\n}\n";
        let mut reporter = DiagnosticReporter::with_color(ColorChoice::Never);
        let file_id = reporter.add_file("dup.dcf", source);

        let diagnostic = Diagnostic::new(
            DiagnosticKind::DuplicateDeclaration { name: "x".into(), ty: Type::Int },
            Span::new(25, 26, 2),
        );
        let rendered = reporter.render(&diagnostic.to_codespan(file_id));
        assert!(rendered.contains("DuplicateDeclaration"));
        assert!(rendered.contains("Already exists: x, int"));
        assert!(rendered.contains("dup.dcf:2"));
    }
}
