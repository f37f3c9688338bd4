//! Frontend trait and the Decaf implementation
//!
//! A frontend is responsible for:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//! 3. Performing semantic analysis and collecting diagnostics

pub mod decaf;

use crate::common::{CompileResult, DiagnosticReporter};

pub use decaf::sema::{Diagnostic, RuleSet};
pub use decaf::DecafFrontend;

/// Configuration options passed to frontends
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub rules: RuleSet,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// Trait for language frontends
pub trait Frontend {
    /// The name of this frontend (e.g., "decaf")
    fn name(&self) -> &'static str;

    /// Run the front end pipeline: lex -> parse -> analyze
    ///
    /// Hard errors (lexing, parsing) are reported through `ctx` and returned
    /// as `Err`; semantic defects come back as diagnostics.
    fn check(
        &self,
        source: &str,
        ctx: &CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<Vec<Diagnostic>>;

    /// Optional: dump tokens for debugging
    fn dump_tokens(&self, source: &str) -> CompileResult<String> {
        let _ = source;
        Ok(String::new())
    }
}
