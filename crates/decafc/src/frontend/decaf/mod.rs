//! Decaf language frontend
//!
//! This frontend handles:
//! - Lexing Decaf source into tokens
//! - Parsing tokens into a Decaf AST
//! - Semantic analysis (scoping, symbol resolution, type checking)

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use crate::common::CompileResult;
use crate::frontend::{CompileContext, Frontend, FrontendConfig};

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_program, Parser};
pub use sema::{Analyzer, AnalyzerConfig, Diagnostic};

/// Decaf language frontend
pub struct DecafFrontend;

impl DecafFrontend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DecafFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontend for DecafFrontend {
    fn name(&self) -> &'static str {
        "decaf"
    }

    fn check(
        &self,
        source: &str,
        ctx: &CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<Vec<Diagnostic>> {
        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            match self.dump_tokens(source) {
                Ok(tokens) => {
                    eprintln!("=== Decaf Tokens ===");
                    eprint!("{}", tokens);
                    eprintln!("=== End Tokens ===\n");
                }
                Err(e) => {
                    ctx.reporter.report_error(ctx.file_id, &e);
                    return Err(e);
                }
            }
        }

        // Phase 2: Parsing
        log::debug!("parsing {}", ctx.filename);
        let program = match parse_program(source) {
            Ok(program) => program,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };

        if config.dump_ast {
            eprintln!("=== Decaf AST ===");
            eprintln!("{:#?}", program);
            eprintln!("=== End AST ===\n");
        }

        // Phase 3: Semantic analysis
        log::debug!("analyzing {}", ctx.filename);
        let mut analyzer = Analyzer::new(AnalyzerConfig { rules: config.rules });
        let diagnostics = analyzer.analyze(&program);
        log::info!("{}: {} diagnostics", ctx.filename, diagnostics.len());

        Ok(diagnostics)
    }

    fn dump_tokens(&self, source: &str) -> CompileResult<String> {
        let lexer = Lexer::new(source);
        let tokens = lexer.tokenize_all()?;
        let mut output = String::new();
        for token in &tokens {
            output.push_str(&format!("{:?}\n", token));
        }
        Ok(output)
    }
}
