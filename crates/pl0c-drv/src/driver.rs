//! The compile-then-run pipeline.
//!
//! Mirrors `pl0c_util::Handler`'s own contract: each stage only runs if no
//! error has been raised by an earlier one. Lexing and parsing always run
//! together (panic-mode recovery wants to report every syntax error it
//! can find in one pass); semantic analysis runs only if that left no
//! errors; codegen and execution only run if analysis left no errors
//! either.

use std::path::Path;

use pl0c_gen::CodeGen;
use pl0c_lex::Lexer;
use pl0c_par::Parser;
use pl0c_sem::Analyzer;
use pl0c_util::{Handler, Interner};
use pl0c_vm::Vm;

use crate::config::Config;
use crate::io::StdIoPort;

/// What the driver decided; the caller maps this straight to an exit code.
/// Failing to even read the source file is reported as an `anyhow::Error`
/// from this function instead, alongside `Config::load`'s own failures.
pub enum Outcome {
    Success,
    CompileError,
    RuntimeError,
}

pub fn compile_and_run(source_path: &Path, config: &Config) -> anyhow::Result<Outcome> {
    let source = std::fs::read_to_string(source_path)
        .map_err(|e| anyhow::anyhow!("could not read '{}': {e}", source_path.display()))?;

    let mut interner = Interner::new();
    let mut handler = Handler::new();

    tracing::debug!(path = %source_path.display(), "lexing and parsing");
    let tokens = Lexer::new(&source, &mut interner, &mut handler).tokenize();
    let mut program = Parser::new(tokens, &mut handler, &mut interner).parse_program();

    if !handler.has_errors() {
        tracing::debug!("running semantic analysis");
        Analyzer::new(&interner, &mut handler).analyze(&mut program);
    }

    for diagnostic in handler.diagnostics() {
        eprintln!("{diagnostic}");
    }

    if handler.has_errors() {
        return Ok(Outcome::CompileError);
    }

    tracing::debug!("generating code");
    let code = CodeGen::generate(&program);

    tracing::debug!(max_stack = config.max_stack, "running");
    let mut io = StdIoPort::new();
    Ok(match Vm::with_max_stack(&code, config.max_stack).run(&mut io) {
        Ok(()) => Outcome::Success,
        Err(err) => {
            eprintln!("[Runtime Error] {err}");
            Outcome::RuntimeError
        }
    })
}
