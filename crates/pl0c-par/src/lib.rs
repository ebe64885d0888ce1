//! pl0c-par - Syntax analysis for PL/0.
//!
//! A hand-written recursive-descent parser over the token stream produced
//! by `pl0c-lex`. Each grammar nonterminal is one parsing method; syntax
//! errors are reported to a shared `Handler` and recovered from in
//! panic mode, so a single malformed program yields every syntax error it
//! contains rather than stopping at the first one. The resulting AST may
//! be partial when errors occurred — callers must check
//! `Handler::has_errors()` before handing it to the semantic analyzer.

pub mod ast;
mod parser;

pub use parser::Parser;
