//! Lowers a semantically-analyzed [`Program`] into [`Code`].
//!
//! The analyzer has already resolved every identifier and folded every
//! constant expression, so this pass never looks anything up by name — it
//! only reads the `resolution` slots the analyzer filled in. Each block is
//! emitted in the classic layout: a leading `JMP` over the block's nested
//! procedures (patched once their code is known), the procedures
//! themselves, an `INT` reserving the block's own frame, the block's body,
//! and a trailing `OPR 0,0` to return.
//!
//! Procedure entry points are recorded in `proc_table` the moment a
//! procedure's own `JMP` is patched — before its body is generated — so a
//! procedure can call itself, and any call can only ever target a
//! previously declared procedure (semantic analysis enforces this), so no
//! `CAL` ever needs backpatching.
//!
//! A parameterized call leaves its arguments sitting below the callee's
//! frame base; see `pl0c_sem::scope` for why. `OPR 0,0`'s `T = B - 1`
//! return only discards the callee's own frame, not those argument words,
//! so a call with `param_count > 0` is followed by an extra `INT` that
//! re-asserts the caller's own frame size and drops them.

use std::collections::HashMap;

use pl0c_par::ast::*;

use crate::instr::{opr, Code, Instruction, Op};

pub struct CodeGen {
    code: Code,
    proc_table: HashMap<u32, crate::instr::InstrAddr>,
}

impl CodeGen {
    fn new() -> Self {
        Self {
            code: Code::new(),
            proc_table: HashMap::new(),
        }
    }

    /// Generates code for an entire program, returning the finished buffer.
    pub fn generate(program: &Program) -> Code {
        let mut gen = Self::new();
        gen.gen_block(&program.block, None);
        gen.code
    }

    fn emit(&mut self, op: Op, level: u32, a: i64) -> crate::instr::InstrAddr {
        self.code.push(Instruction { op, level, a })
    }

    fn patch_jmp(&mut self, at: crate::instr::InstrAddr, target: crate::instr::InstrAddr) {
        self.code.patch(
            at,
            Instruction {
                op: Op::Jmp,
                level: 0,
                a: target.0 as i64,
            },
        );
    }

    fn patch_jpc(&mut self, at: crate::instr::InstrAddr, target: crate::instr::InstrAddr) {
        self.code.patch(
            at,
            Instruction {
                op: Op::Jpc,
                level: 0,
                a: target.0 as i64,
            },
        );
    }

    /// `proc_id` is `Some` when this block is a procedure body, so its
    /// entry point can be recorded for later calls (including itself).
    fn gen_block(&mut self, block: &Block, proc_id: Option<u32>) {
        let jmp = self.emit(Op::Jmp, 0, 0);
        for proc in &block.procs {
            self.gen_block(&proc.block, proc.proc_id);
        }

        let body_entry = self.code.next_index();
        self.patch_jmp(jmp, body_entry);
        if let Some(id) = proc_id {
            self.proc_table.insert(id, body_entry);
        }

        let frame_size = block_frame_size(block);
        self.emit(Op::Int, 0, frame_size);
        self.gen_stmt(&block.body, frame_size);
        self.emit(Op::Opr, 0, opr::RET);
    }

    fn gen_stmt(&mut self, stmt: &Statement, frame_size: i64) {
        match stmt {
            Statement::Assign { target, expr, .. } => {
                self.gen_expr(expr);
                self.emit_var(Op::Sto, target);
            }
            Statement::Call { name, args, .. } => {
                for arg in args {
                    self.gen_expr(arg);
                }
                let (level_diff, proc_id, param_count) = match name.resolution {
                    Some(Resolution::Procedure {
                        level_diff,
                        proc_id,
                        param_count,
                    }) => (level_diff, proc_id, param_count),
                    other => unreachable!(
                        "semantic analysis guarantees call targets are procedures; got {other:?}"
                    ),
                };
                let entry = *self
                    .proc_table
                    .get(&proc_id)
                    .expect("a procedure's entry is recorded before any call to it is generated");
                self.emit(Op::Cal, level_diff, entry.0 as i64);
                if param_count > 0 {
                    self.emit(Op::Int, 0, frame_size);
                }
            }
            Statement::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.gen_cond(cond);
                let jpc = self.emit(Op::Jpc, 0, 0);
                self.gen_stmt(then_branch, frame_size);
                match else_branch {
                    Some(else_branch) => {
                        let jmp = self.emit(Op::Jmp, 0, 0);
                        let else_entry = self.code.next_index();
                        self.patch_jpc(jpc, else_entry);
                        self.gen_stmt(else_branch, frame_size);
                        let end = self.code.next_index();
                        self.patch_jmp(jmp, end);
                    }
                    None => {
                        let end = self.code.next_index();
                        self.patch_jpc(jpc, end);
                    }
                }
            }
            Statement::While { cond, body, .. } => {
                let start = self.code.next_index();
                self.gen_cond(cond);
                let jpc = self.emit(Op::Jpc, 0, 0);
                self.gen_stmt(body, frame_size);
                self.emit(Op::Jmp, 0, start.0 as i64);
                let end = self.code.next_index();
                self.patch_jpc(jpc, end);
            }
            Statement::Compound { stmts, .. } => {
                for s in stmts {
                    self.gen_stmt(s, frame_size);
                }
            }
            Statement::Read { names, .. } => {
                for name in names {
                    self.emit_var(Op::Red, name);
                }
            }
            Statement::Write { exprs, .. } => {
                for expr in exprs {
                    self.gen_expr(expr);
                    self.emit(Op::Wrt, 0, 0);
                }
            }
            Statement::Empty { .. } => {}
        }
    }

    fn emit_var(&mut self, op: Op, ident: &Ident) {
        match ident.resolution {
            Some(Resolution::Var { level_diff, offset }) => {
                self.emit(op, level_diff, offset);
            }
            other => unreachable!(
                "semantic analysis guarantees assignment/read targets are variables; got {other:?}"
            ),
        }
    }

    fn gen_cond(&mut self, cond: &Condition) {
        match cond {
            Condition::Odd { expr, .. } => {
                self.gen_expr(expr);
                self.emit(Op::Opr, 0, opr::ODD);
            }
            Condition::Rel {
                op, left, right, ..
            } => {
                self.gen_expr(left);
                self.gen_expr(right);
                let code = match op {
                    RelOp::Eq => opr::EQ,
                    RelOp::Ne => opr::NE,
                    RelOp::Lt => opr::LT,
                    RelOp::Le => opr::LE,
                    RelOp::Gt => opr::GT,
                    RelOp::Ge => opr::GE,
                };
                self.emit(Op::Opr, 0, code);
            }
        }
    }

    fn gen_expr(&mut self, expr: &Expression) {
        match expr {
            Expression::Num { value, .. } => {
                self.emit(Op::Lit, 0, *value);
            }
            Expression::Var(ident) => {
                let (level_diff, offset) = match ident.resolution {
                    Some(Resolution::Var { level_diff, offset }) => (level_diff, offset),
                    other => unreachable!(
                        "constant folding removes every Const-resolved Var before codegen; got {other:?}"
                    ),
                };
                self.emit(Op::Lod, level_diff, offset);
            }
            Expression::Unary { op, expr: inner, .. } => {
                self.gen_expr(inner);
                if *op == UnaryOp::Neg {
                    self.emit(Op::Opr, 0, opr::NEG);
                }
            }
            Expression::Binary {
                op, left, right, ..
            } => {
                self.gen_expr(left);
                self.gen_expr(right);
                let code = match op {
                    BinOp::Add => opr::ADD,
                    BinOp::Sub => opr::SUB,
                    BinOp::Mul => opr::MUL,
                    BinOp::Div => opr::DIV,
                };
                self.emit(Op::Opr, 0, code);
            }
        }
    }
}

/// `[SL, DL, RA]` — every frame's header, before any locals.
const FRAME_HEADER: i64 = 3;

/// Slots this block's own `INT` must reserve: the header plus one per
/// local. Parameters aren't counted — they live below the frame base and
/// the caller already accounted for them.
fn block_frame_size(block: &Block) -> i64 {
    FRAME_HEADER + block.vars.len() as i64
}
