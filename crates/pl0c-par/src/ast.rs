//! AST node definitions for PL/0.
//!
//! Every node carries its source line for diagnostics. Use sites —
//! `Expression::Var`, `Statement::Assign`'s target, `Statement::Call`'s
//! name, and `Statement::Read`'s names — carry an `Ident` with a
//! `resolution` slot that the semantic analyzer fills in; nothing reads it
//! until analysis has run.

use pl0c_util::{Line, Symbol};

/// What a resolved name turned out to be, and everything the code
/// generator needs to address it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A constant folds away entirely; its value is substituted directly.
    Const(i64),
    /// A variable lives at `offset` in the frame `level_diff` static links
    /// up. Locals sit at `offset >= 3`; value parameters sit at negative
    /// offsets (see `pl0c_sem::scope` for why) and are otherwise addressed
    /// exactly the same way.
    Var { level_diff: u32, offset: i64 },
    /// A procedure is called via the code generator's procedure table,
    /// indexed by `proc_id` (see `pl0c_par::ast::Procedure::proc_id`).
    Procedure {
        level_diff: u32,
        proc_id: u32,
        param_count: usize,
    },
}

/// An identifier use site: the raw name as written, plus (after semantic
/// analysis) what it resolved to.
#[derive(Clone, Debug)]
pub struct Ident {
    pub name: Symbol,
    pub line: Line,
    pub resolution: Option<Resolution>,
}

impl Ident {
    pub fn new(name: Symbol, line: Line) -> Self {
        Self {
            name,
            line,
            resolution: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Program {
    pub name: Symbol,
    pub block: Block,
    pub line: Line,
}

#[derive(Clone, Debug)]
pub struct Block {
    pub consts: Vec<ConstDecl>,
    pub vars: Vec<VarDecl>,
    pub procs: Vec<Procedure>,
    pub body: Box<Statement>,
}

#[derive(Clone, Debug)]
pub struct ConstDecl {
    pub name: Symbol,
    pub value: i64,
    pub line: Line,
}

#[derive(Clone, Debug)]
pub struct VarDecl {
    pub name: Symbol,
    pub line: Line,
}

#[derive(Clone, Debug)]
pub struct Procedure {
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub block: Block,
    pub line: Line,
    /// Assigned by the semantic analyzer when the declaration is bound;
    /// indexes the code generator's procedure entry-address table.
    pub proc_id: Option<u32>,
}

#[derive(Clone, Debug)]
pub enum Statement {
    Assign {
        target: Ident,
        expr: Expression,
        line: Line,
    },
    Call {
        name: Ident,
        args: Vec<Expression>,
        line: Line,
    },
    If {
        cond: Condition,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        line: Line,
    },
    While {
        cond: Condition,
        body: Box<Statement>,
        line: Line,
    },
    Compound {
        stmts: Vec<Statement>,
        line: Line,
    },
    Read {
        names: Vec<Ident>,
        line: Line,
    },
    Write {
        exprs: Vec<Expression>,
        line: Line,
    },
    /// The empty statement — produced by an empty production in the
    /// grammar (e.g. a trailing `;` before `end`) and as a recovery
    /// placeholder after a panic-mode resynchronization.
    Empty {
        line: Line,
    },
}

impl Statement {
    pub fn line(&self) -> Line {
        match self {
            Statement::Assign { line, .. }
            | Statement::Call { line, .. }
            | Statement::If { line, .. }
            | Statement::While { line, .. }
            | Statement::Compound { line, .. }
            | Statement::Read { line, .. }
            | Statement::Write { line, .. }
            | Statement::Empty { line } => *line,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Debug)]
pub enum Condition {
    Odd {
        expr: Expression,
        line: Line,
    },
    Rel {
        op: RelOp,
        left: Expression,
        right: Expression,
        line: Line,
    },
}

impl Condition {
    pub fn line(&self) -> Line {
        match self {
            Condition::Odd { line, .. } | Condition::Rel { line, .. } => *line,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Debug)]
pub enum Expression {
    Num {
        value: i64,
        line: Line,
    },
    Var(Ident),
    Unary {
        op: UnaryOp,
        expr: Box<Expression>,
        line: Line,
    },
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
        line: Line,
    },
}

impl Expression {
    pub fn line(&self) -> Line {
        match self {
            Expression::Num { line, .. }
            | Expression::Unary { line, .. }
            | Expression::Binary { line, .. } => *line,
            Expression::Var(ident) => ident.line,
        }
    }
}
