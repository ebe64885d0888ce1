//! pl0c-sem - Semantic analysis for PL/0.
//!
//! Walks the parser's AST, resolving every identifier against a scoped
//! symbol table, checking procedure call arity, folding constant
//! expressions (catching compile-time division by zero along the way),
//! and flagging a few statically-detectable dead branches and
//! non-terminating loops. Analysis mutates the AST in place; the code
//! generator consumes the decorated tree and never resolves a name itself.

mod analysis;
mod scope;
mod suggest;

pub use analysis::Analyzer;
pub use scope::FIRST_OFFSET;
