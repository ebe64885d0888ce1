//! pl0c-util - Shared foundation types for the PL/0 compiler pipeline.
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! Every stage of the pipeline (lexer, parser, semantic analyzer, code
//! generator, VM) needs three things in common:
//!
//! 1. A way to name a source line for diagnostics (`Line`).
//! 2. A way to collect and format diagnostics (`Diagnostic`, `Handler`).
//! 3. A way to intern identifier text so the rest of the pipeline can
//!    compare names by a cheap `Copy` key instead of `String` (`Symbol`,
//!    `Interner`).
//!
//! `index_vec` additionally gives the code generator a typed, append-only
//! buffer with a `patch` operation, used for backpatching forward jumps.
//!
//! None of this is global state: every type here is owned by whichever
//! stage object constructs it, and is dropped when that stage is done.

mod diagnostic;
mod index_vec;
mod line;
mod symbol;

pub use diagnostic::{Diagnostic, Handler, Phase, Severity};
pub use index_vec::{Idx, IndexVec};
pub use line::Line;
pub use symbol::{Interner, Symbol};
