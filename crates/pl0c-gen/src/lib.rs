//! pl0c-gen - Lowers a semantically-analyzed PL/0 AST into P-Code.
//!
//! Trusts the analyzer's invariants completely: every identifier it reads
//! is already resolved, every foldable expression is already a `Num`, and
//! every procedure call already has the right arity. There is no
//! `CodegenError` — a decorated AST that violates one of these invariants
//! is a bug in the analyzer, not a condition this crate recovers from.

mod codegen;
mod instr;

pub use codegen::CodeGen;
pub use instr::{opr, Code, InstrAddr, Instruction, Op};
