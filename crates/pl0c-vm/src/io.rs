//! The VM's `RED`/`WRT` side channel.
//!
//! Kept as a trait so tests can feed a program canned input and capture
//! its output without touching the process's real stdin/stdout; the
//! driver supplies the real implementation.

use crate::error::RuntimeError;

pub trait IoPort {
    fn read_int(&mut self) -> Result<i64, RuntimeError>;
    fn write_int(&mut self, value: i64) -> Result<(), RuntimeError>;
}

/// Feeds `read`'s answers from a fixed list, in order; records every
/// `write` for later inspection. Used by this crate's own tests.
#[derive(Default)]
pub struct FixedIoPort {
    pub input: std::collections::VecDeque<i64>,
    pub output: Vec<i64>,
}

impl FixedIoPort {
    pub fn new(input: impl IntoIterator<Item = i64>) -> Self {
        Self {
            input: input.into_iter().collect(),
            output: Vec::new(),
        }
    }
}

impl IoPort for FixedIoPort {
    fn read_int(&mut self) -> Result<i64, RuntimeError> {
        self.input.pop_front().ok_or(RuntimeError::UnexpectedEof)
    }

    fn write_int(&mut self, value: i64) -> Result<(), RuntimeError> {
        self.output.push(value);
        Ok(())
    }
}
