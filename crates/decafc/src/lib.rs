//! decafc - semantic analyzer for the Decaf teaching language
//!
//! This library checks Decaf programs for scoping and typing errors and
//! reports every defect it finds in a single pass.
//!
//! ## Architecture
//!
//! The analyzer is organized into:
//! - **Frontend** (`frontend/`): Decaf lexing, parsing and semantic analysis
//! - **Common** (`common/`): Shared infrastructure (errors, spans, rendering)

pub mod common;
pub mod frontend;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use frontend::{CompileContext, DecafFrontend, Diagnostic, Frontend, FrontendConfig, RuleSet};
pub use frontend::decaf::sema::{analyze_program, Analyzer, AnalyzerConfig};
