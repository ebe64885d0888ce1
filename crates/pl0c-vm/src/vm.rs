//! The stack machine that runs P-Code.
//!
//! Registers `P` (program counter), `B` (current frame base) and `T`
//! (stack top) and a single `stack: Vec<i64>` are the entire machine
//! state. Every frame is `[SL, DL, RA, locals...]`; a procedure's value
//! parameters sit just below its own `SL` at negative offsets (see
//! `pl0c_sem::scope` for why), and `base(level, B)` walks `level` static
//! links up from the current frame to address an enclosing one.

use pl0c_gen::{opr, Code, InstrAddr, Op};

use crate::error::RuntimeError;
use crate::io::IoPort;

/// Default ceiling on stack depth, generous enough for any reasonable
/// amount of recursion while still catching a runaway one quickly.
pub const DEFAULT_MAX_STACK: usize = 4096;

pub struct Vm<'a> {
    code: &'a Code,
    stack: Vec<i64>,
    p: i64,
    b: i64,
    t: i64,
    max_stack: usize,
    halted: bool,
}

impl<'a> Vm<'a> {
    pub fn new(code: &'a Code) -> Self {
        Self::with_max_stack(code, DEFAULT_MAX_STACK)
    }

    pub fn with_max_stack(code: &'a Code, max_stack: usize) -> Self {
        Self {
            code,
            stack: vec![0, 0, 0],
            p: 0,
            b: 0,
            t: 2,
            max_stack,
            halted: false,
        }
    }

    /// Runs until the outermost block returns (`P` reaches 0 on `OPR 0,0`).
    pub fn run(&mut self, io: &mut dyn IoPort) -> Result<(), RuntimeError> {
        while !self.halted {
            self.step(io)?;
        }
        Ok(())
    }

    fn step(&mut self, io: &mut dyn IoPort) -> Result<(), RuntimeError> {
        let instr = self.code[InstrAddr(self.p as u32)];
        self.p += 1;

        match instr.op {
            Op::Lit => self.push(instr.a)?,
            Op::Lod => {
                let addr = self.addr(instr.level, instr.a);
                self.push(self.stack[addr])?;
            }
            Op::Sto => {
                let value = self.pop();
                let addr = self.addr(instr.level, instr.a);
                self.stack[addr] = value;
            }
            Op::Cal => self.exec_call(instr.level, instr.a)?,
            Op::Int => {
                let new_t = self.b + instr.a - 1;
                self.reserve(new_t)?;
                self.t = new_t;
            }
            Op::Jmp => self.p = instr.a,
            Op::Jpc => {
                if self.pop() == 0 {
                    self.p = instr.a;
                }
            }
            Op::Opr => self.exec_opr(instr.a)?,
            Op::Red => {
                let value = io.read_int()?;
                let addr = self.addr(instr.level, instr.a);
                self.stack[addr] = value;
            }
            Op::Wrt => {
                let value = self.pop();
                io.write_int(value)?;
            }
        }
        Ok(())
    }

    fn exec_call(&mut self, level: u32, entry: i64) -> Result<(), RuntimeError> {
        let sl = self.base(level, self.b);
        let new_b = self.t + 1;
        self.reserve(new_b + 2)?;
        self.stack[new_b as usize] = sl;
        self.stack[new_b as usize + 1] = self.b;
        self.stack[new_b as usize + 2] = self.p;
        self.t = new_b + 2;
        self.b = new_b;
        self.p = entry;
        Ok(())
    }

    fn exec_opr(&mut self, code: i64) -> Result<(), RuntimeError> {
        match code {
            opr::RET => {
                self.t = self.b - 1;
                self.p = self.stack[self.b as usize + 2];
                self.b = self.stack[self.b as usize + 1];
                if self.p == 0 {
                    self.halted = true;
                }
            }
            opr::NEG => {
                let v = self.pop();
                self.push(-v)?;
            }
            opr::ADD => {
                let (l, r) = self.pop2();
                self.push(l + r)?;
            }
            opr::SUB => {
                let (l, r) = self.pop2();
                self.push(l - r)?;
            }
            opr::MUL => {
                let (l, r) = self.pop2();
                self.push(l * r)?;
            }
            opr::DIV => {
                let (l, r) = self.pop2();
                if r == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                self.push(l / r)?;
            }
            opr::ODD => {
                let v = self.pop();
                self.push((v.rem_euclid(2) != 0) as i64)?;
            }
            opr::EQ => {
                let (l, r) = self.pop2();
                self.push((l == r) as i64)?;
            }
            opr::NE => {
                let (l, r) = self.pop2();
                self.push((l != r) as i64)?;
            }
            opr::LT => {
                let (l, r) = self.pop2();
                self.push((l < r) as i64)?;
            }
            opr::GE => {
                let (l, r) = self.pop2();
                self.push((l >= r) as i64)?;
            }
            opr::GT => {
                let (l, r) = self.pop2();
                self.push((l > r) as i64)?;
            }
            opr::LE => {
                let (l, r) = self.pop2();
                self.push((l <= r) as i64)?;
            }
            other => unreachable!("codegen only ever emits defined OPR subcodes, got {other}"),
        }
        Ok(())
    }

    /// Walks `level` static links up from `start`.
    fn base(&self, level: u32, start: i64) -> i64 {
        let mut b = start;
        for _ in 0..level {
            b = self.stack[b as usize];
        }
        b
    }

    fn addr(&self, level: u32, a: i64) -> usize {
        (self.base(level, self.b) + a) as usize
    }

    fn push(&mut self, value: i64) -> Result<(), RuntimeError> {
        let new_t = self.t + 1;
        self.reserve(new_t)?;
        self.stack[new_t as usize] = value;
        self.t = new_t;
        Ok(())
    }

    fn pop(&mut self) -> i64 {
        let value = self.stack[self.t as usize];
        self.t -= 1;
        value
    }

    fn pop2(&mut self) -> (i64, i64) {
        let r = self.pop();
        let l = self.pop();
        (l, r)
    }

    /// Grows the backing `Vec` to cover `up_to`, failing if that would
    /// exceed the configured ceiling.
    fn reserve(&mut self, up_to: i64) -> Result<(), RuntimeError> {
        if up_to as usize >= self.max_stack {
            return Err(RuntimeError::StackOverflow { max: self.max_stack });
        }
        while self.stack.len() <= up_to as usize {
            self.stack.push(0);
        }
        Ok(())
    }
}
