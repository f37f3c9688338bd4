//! decafc - Decaf semantic analyzer
//!
//! Usage: decafc [OPTIONS] <input>

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use decaf_compiler::common::DiagnosticReporter;
use decaf_compiler::frontend::{CompileContext, DecafFrontend, Frontend, FrontendConfig, RuleSet};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "decafc")]
#[command(version)]
#[command(about = "Scope and type checker for Decaf programs", long_about = None)]
struct Args {
    /// Input source file (.dcf)
    #[arg(required = true)]
    input: PathBuf,

    /// Reproduce the diagnostics of the Decaf course checker
    #[arg(long)]
    legacy_rules: bool,

    /// Print `Error line N: ...` lines instead of annotated source
    #[arg(long)]
    plain: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG still overrides the flag
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Check one file; `Ok(false)` when the program has defects
fn run(args: &Args) -> Result<bool> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let frontend = DecafFrontend::new();
    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        rules: if args.legacy_rules { RuleSet::Legacy } else { RuleSet::Standard },
    };
    log::info!("checking {} with the {} frontend ({:?} rules)", filename, frontend.name(), config.rules);

    let ctx = CompileContext::new(filename, file_id, &reporter);
    let Ok(diagnostics) = frontend.check(&source, &ctx, &config) else {
        // Already rendered through the reporter
        return Ok(false);
    };

    for diagnostic in &diagnostics {
        if args.plain {
            println!("{}", diagnostic);
        } else {
            reporter.emit(&diagnostic.to_codespan(file_id));
        }
    }

    Ok(diagnostics.is_empty())
}
