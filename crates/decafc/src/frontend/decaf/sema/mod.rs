//! Semantic analysis module
//!
//! Builds nested scopes over the AST, binds every identifier to its
//! declaration and checks the static typing rules of Decaf.

mod scope;
mod analyzer;
mod diagnostic;
mod types;

pub use scope::{DuplicateError, ScopeTable, Symbol, SymbolKind};
pub use analyzer::{analyze_program, Analyzer, AnalyzerConfig, RuleSet};
pub use diagnostic::{Diagnostic, DiagnosticKind, MismatchKind};
pub use types::Type;
