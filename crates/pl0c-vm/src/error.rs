//! Runtime errors: everything that can go wrong once the program is
//! already running, as opposed to the compile-time diagnostics in
//! `pl0c_util::Diagnostic`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("stack overflow: exceeded {max} words")]
    StackOverflow { max: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("expected an integer, found '{found}'")]
    MalformedInput { found: String },

    #[error("unexpected end of input while reading an integer")]
    UnexpectedEof,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
