//! The real stdin/stdout `IoPort`. Tests use `pl0c_vm::FixedIoPort`
//! instead so they don't depend on the process's actual stdin.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin};

use pl0c_vm::{IoPort, RuntimeError};

pub struct StdIoPort {
    input: BufReader<Stdin>,
    pending: VecDeque<String>,
}

impl StdIoPort {
    pub fn new() -> Self {
        Self {
            input: BufReader::new(io::stdin()),
            pending: VecDeque::new(),
        }
    }

    /// `read(x)` consumes one whitespace-separated token, which may
    /// share a line with others or sit on a line of its own; pull more
    /// lines from stdin until one is available.
    fn next_token(&mut self) -> Result<String, RuntimeError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            let bytes_read = self.input.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(RuntimeError::UnexpectedEof);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

impl Default for StdIoPort {
    fn default() -> Self {
        Self::new()
    }
}

impl IoPort for StdIoPort {
    fn read_int(&mut self) -> Result<i64, RuntimeError> {
        let token = self.next_token()?;
        token
            .parse()
            .map_err(|_| RuntimeError::MalformedInput { found: token })
    }

    fn write_int(&mut self, value: i64) -> Result<(), RuntimeError> {
        println!("{value}");
        Ok(())
    }
}
