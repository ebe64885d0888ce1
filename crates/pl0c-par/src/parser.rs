//! Recursive-descent parser with panic-mode error recovery.
//!
//! Each nonterminal has a synchronization set: the tokens it is safe to
//! resume parsing from after a syntax error. The sets are cumulative by
//! nesting level — a statement sits inside a block which sits inside the
//! program, so a statement-level recovery must also recognize block- and
//! program-level synchronization tokens, or it would run past them looking
//! for a token it'll never see.

use crate::ast::*;
use pl0c_lex::{Token, TokenKind};
use pl0c_util::{Handler, Interner, Line, Phase, Symbol};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Sync {
    Semi,
    Comma,
    End,
    If,
    While,
    Begin,
    Call,
    Read,
    Write,
    Else,
    Ident,
    Const,
    Var,
    Procedure,
    Dot,
    Eof,
}

fn classify(kind: &TokenKind) -> Option<Sync> {
    Some(match kind {
        TokenKind::Semicolon => Sync::Semi,
        TokenKind::Comma => Sync::Comma,
        TokenKind::End => Sync::End,
        TokenKind::If => Sync::If,
        TokenKind::While => Sync::While,
        TokenKind::Begin => Sync::Begin,
        TokenKind::Call => Sync::Call,
        TokenKind::Read => Sync::Read,
        TokenKind::Write => Sync::Write,
        TokenKind::Else => Sync::Else,
        TokenKind::Ident(_) => Sync::Ident,
        TokenKind::Const => Sync::Const,
        TokenKind::Var => Sync::Var,
        TokenKind::Procedure => Sync::Procedure,
        TokenKind::Dot => Sync::Dot,
        TokenKind::Eof => Sync::Eof,
        _ => return None,
    })
}

const PROGRAM_SYNC: &[Sync] = &[Sync::Dot, Sync::Eof];
const BLOCK_SYNC: &[Sync] = &[Sync::Const, Sync::Var, Sync::Procedure, Sync::Dot, Sync::Eof];
const STATEMENT_SYNC: &[Sync] = &[
    Sync::Semi,
    Sync::Comma,
    Sync::End,
    Sync::If,
    Sync::While,
    Sync::Begin,
    Sync::Call,
    Sync::Read,
    Sync::Write,
    Sync::Else,
    Sync::Ident,
    Sync::Const,
    Sync::Var,
    Sync::Procedure,
    Sync::Dot,
    Sync::Eof,
];

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    handler: &'a mut Handler,
    /// Only used to mint the placeholder symbol substituted for a missing
    /// identifier after a syntax error; real identifiers arrive already
    /// interned in the token stream.
    interner: &'a mut Interner,
    error_name: Option<Symbol>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a mut Handler, interner: &'a mut Interner) -> Self {
        Self {
            tokens,
            pos: 0,
            handler,
            interner,
            error_name: None,
        }
    }

    /// Parses a whole program. The result may be partial if syntax errors
    /// were recovered from — check `handler.has_errors()` before trusting it.
    pub fn parse_program(mut self) -> Program {
        let line = self.current().line;
        if !self.eat(TokenKind::Program) {
            self.error_expected("'program'");
            self.synchronize(PROGRAM_SYNC);
        }
        let name = self.eat_ident_name();
        if !self.eat(TokenKind::Semicolon) {
            self.error_expected("';'");
            self.synchronize(PROGRAM_SYNC);
        }
        let block = self.parse_block();
        if !self.eat(TokenKind::Dot) {
            self.error_expected("'.'");
            self.synchronize(PROGRAM_SYNC);
        }
        Program { name, block, line }
    }

    fn parse_block(&mut self) -> Block {
        let mut consts = Vec::new();
        if self.check(TokenKind::Const) {
            self.advance();
            loop {
                let line = self.current().line;
                let name = self.eat_ident_name();
                if !self.eat(TokenKind::Eq) {
                    self.error_expected("'='");
                    self.synchronize(BLOCK_SYNC);
                }
                let value = self.eat_int();
                consts.push(ConstDecl { name, value, line });
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            if !self.eat(TokenKind::Semicolon) {
                self.error_expected("';'");
                self.synchronize(BLOCK_SYNC);
            }
        }

        let mut vars = Vec::new();
        if self.check(TokenKind::Var) {
            self.advance();
            loop {
                let line = self.current().line;
                let name = self.eat_ident_name();
                vars.push(VarDecl { name, line });
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            if !self.eat(TokenKind::Semicolon) {
                self.error_expected("';'");
                self.synchronize(BLOCK_SYNC);
            }
        }

        let mut procs = Vec::new();
        while self.check(TokenKind::Procedure) {
            let line = self.current().line;
            self.advance();
            let name = self.eat_ident_name();
            let mut params = Vec::new();
            if self.check(TokenKind::LParen) {
                self.advance();
                if !self.check(TokenKind::RParen) {
                    loop {
                        params.push(self.eat_ident_name());
                        if !self.check(TokenKind::Comma) {
                            break;
                        }
                        self.advance();
                    }
                }
                if !self.eat(TokenKind::RParen) {
                    self.error_expected("')'");
                    self.synchronize(BLOCK_SYNC);
                }
            }
            if !self.eat(TokenKind::Semicolon) {
                self.error_expected("';'");
                self.synchronize(BLOCK_SYNC);
            }
            let block = self.parse_block();
            if !self.eat(TokenKind::Semicolon) {
                self.error_expected("';'");
                self.synchronize(BLOCK_SYNC);
            }
            procs.push(Procedure {
                name,
                params,
                block,
                line,
                proc_id: None,
            });
        }

        let body = Box::new(self.parse_statement());
        Block {
            consts,
            vars,
            procs,
            body,
        }
    }

    fn parse_statement(&mut self) -> Statement {
        let line = self.current().line;
        match self.current().kind {
            TokenKind::Ident(_) => {
                let target = Ident::new(self.eat_ident_name(), line);
                if !self.eat(TokenKind::Assign) {
                    self.error_expected("':='");
                    self.synchronize(STATEMENT_SYNC);
                    return Statement::Empty { line };
                }
                let expr = self.parse_expression();
                Statement::Assign { target, expr, line }
            }
            TokenKind::Call => {
                self.advance();
                let name = Ident::new(self.eat_ident_name(), line);
                let mut args = Vec::new();
                if self.check(TokenKind::LParen) {
                    self.advance();
                    if !self.check(TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expression());
                            if !self.check(TokenKind::Comma) {
                                break;
                            }
                            self.advance();
                        }
                    }
                    if !self.eat(TokenKind::RParen) {
                        self.error_expected("')'");
                        self.synchronize(STATEMENT_SYNC);
                    }
                }
                Statement::Call { name, args, line }
            }
            TokenKind::Begin => {
                self.advance();
                let mut stmts = vec![self.parse_statement()];
                while self.check(TokenKind::Semicolon) {
                    self.advance();
                    stmts.push(self.parse_statement());
                }
                if !self.eat(TokenKind::End) {
                    self.error_expected("'end'");
                    self.synchronize(STATEMENT_SYNC);
                }
                Statement::Compound { stmts, line }
            }
            TokenKind::If => {
                self.advance();
                let cond = self.parse_condition();
                if !self.eat(TokenKind::Then) {
                    self.error_expected("'then'");
                    self.synchronize(STATEMENT_SYNC);
                }
                let then_branch = Box::new(self.parse_statement());
                let else_branch = if self.check(TokenKind::Else) {
                    self.advance();
                    Some(Box::new(self.parse_statement()))
                } else {
                    None
                };
                Statement::If {
                    cond,
                    then_branch,
                    else_branch,
                    line,
                }
            }
            TokenKind::While => {
                self.advance();
                let cond = self.parse_condition();
                if !self.eat(TokenKind::Do) {
                    self.error_expected("'do'");
                    self.synchronize(STATEMENT_SYNC);
                }
                let body = Box::new(self.parse_statement());
                Statement::While { cond, body, line }
            }
            TokenKind::Read => {
                self.advance();
                let mut names = Vec::new();
                if !self.eat(TokenKind::LParen) {
                    self.error_expected("'('");
                    self.synchronize(STATEMENT_SYNC);
                }
                loop {
                    let iline = self.current().line;
                    names.push(Ident::new(self.eat_ident_name(), iline));
                    if !self.check(TokenKind::Comma) {
                        break;
                    }
                    self.advance();
                }
                if !self.eat(TokenKind::RParen) {
                    self.error_expected("')'");
                    self.synchronize(STATEMENT_SYNC);
                }
                Statement::Read { names, line }
            }
            TokenKind::Write => {
                self.advance();
                let mut exprs = Vec::new();
                if !self.eat(TokenKind::LParen) {
                    self.error_expected("'('");
                    self.synchronize(STATEMENT_SYNC);
                }
                loop {
                    exprs.push(self.parse_expression());
                    if !self.check(TokenKind::Comma) {
                        break;
                    }
                    self.advance();
                }
                if !self.eat(TokenKind::RParen) {
                    self.error_expected("')'");
                    self.synchronize(STATEMENT_SYNC);
                }
                Statement::Write { exprs, line }
            }
            // Empty statement: the grammar's statement production allows
            // nothing, so any token that starts a following construct
            // (';', 'end', etc.) is left untouched for the caller.
            _ => Statement::Empty { line },
        }
    }

    fn parse_condition(&mut self) -> Condition {
        let line = self.current().line;
        if self.check(TokenKind::Odd) {
            self.advance();
            let expr = self.parse_expression();
            return Condition::Odd { expr, line };
        }
        let left = self.parse_expression();
        let op = match self.current().kind {
            TokenKind::Eq => RelOp::Eq,
            TokenKind::Ne => RelOp::Ne,
            TokenKind::Lt => RelOp::Lt,
            TokenKind::Le => RelOp::Le,
            TokenKind::Gt => RelOp::Gt,
            TokenKind::Ge => RelOp::Ge,
            _ => {
                self.error_expected("a relational operator");
                self.synchronize(STATEMENT_SYNC);
                return Condition::Rel {
                    op: RelOp::Eq,
                    left,
                    right: Expression::Num { value: 0, line },
                    line,
                };
            }
        };
        self.advance();
        let right = self.parse_expression();
        Condition::Rel {
            op,
            left,
            right,
            line,
        }
    }

    fn parse_expression(&mut self) -> Expression {
        let line = self.current().line;
        let mut expr = match self.current().kind {
            TokenKind::Plus => {
                self.advance();
                let inner = self.parse_term();
                Expression::Unary {
                    op: UnaryOp::Pos,
                    expr: Box::new(inner),
                    line,
                }
            }
            TokenKind::Minus => {
                self.advance();
                let inner = self.parse_term();
                Expression::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(inner),
                    line,
                }
            }
            _ => self.parse_term(),
        };
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let op_line = self.current().line;
            self.advance();
            let right = self.parse_term();
            expr = Expression::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line: op_line,
            };
        }
        expr
    }

    fn parse_term(&mut self) -> Expression {
        let mut expr = self.parse_factor();
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            let op_line = self.current().line;
            self.advance();
            let right = self.parse_factor();
            expr = Expression::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line: op_line,
            };
        }
        expr
    }

    fn parse_factor(&mut self) -> Expression {
        let line = self.current().line;
        match self.current().kind {
            TokenKind::Ident(_) => {
                let name = self.eat_ident_name();
                Expression::Var(Ident::new(name, line))
            }
            TokenKind::Int(value) => {
                self.advance();
                Expression::Num { value, line }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression();
                if !self.eat(TokenKind::RParen) {
                    self.error_expected("')'");
                    self.synchronize(STATEMENT_SYNC);
                }
                expr
            }
            _ => {
                self.error_expected("an identifier, integer literal, or '('");
                self.synchronize(STATEMENT_SYNC);
                Expression::Num { value: 0, line }
            }
        }
    }

    // --- token-stream plumbing ---

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes an identifier token and returns its interned name, or
    /// reports an error and returns a placeholder without consuming
    /// anything if the current token isn't one.
    fn eat_ident_name(&mut self) -> Symbol {
        if let TokenKind::Ident(sym) = self.current().kind {
            self.advance();
            sym
        } else {
            self.error_expected("an identifier");
            self.synchronize(STATEMENT_SYNC);
            self.placeholder_name()
        }
    }

    fn placeholder_name(&mut self) -> Symbol {
        if let Some(sym) = self.error_name {
            return sym;
        }
        let sym = self.interner.intern("<error>");
        self.error_name = Some(sym);
        sym
    }

    fn eat_int(&mut self) -> i64 {
        if let TokenKind::Int(value) = self.current().kind {
            self.advance();
            value
        } else {
            self.error_expected("an integer literal");
            self.synchronize(STATEMENT_SYNC);
            0
        }
    }

    fn error_expected(&mut self, expected: &str) {
        let found = self.current().kind.describe();
        let line = self.current().line;
        self.report(line, format!("expected {expected}, found {found}"));
    }

    fn report(&mut self, line: Line, message: impl Into<String>) {
        self.handler.error(Phase::Syntax, line, message);
    }

    /// Discards tokens until one classifies into `allowed`, or end of input.
    fn synchronize(&mut self, allowed: &[Sync]) {
        while !matches!(self.current().kind, TokenKind::Eof) {
            if let Some(c) = classify(&self.current().kind) {
                if allowed.contains(&c) {
                    return;
                }
            }
            self.advance();
        }
    }
}
