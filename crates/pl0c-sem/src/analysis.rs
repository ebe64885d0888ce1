//! Semantic analysis: name resolution, arity checking, constant folding,
//! and a handful of static diagnostics (division by zero, dead branches,
//! loops that can never terminate).
//!
//! Analysis decorates the AST in place — every `Ident`'s `resolution`
//! field is filled in, `Procedure::proc_id` is assigned, and expressions
//! that fold to a compile-time constant are rewritten to `Expression::Num`
//! — so the code generator never has to resolve a name or re-derive a
//! constant itself.

use crate::scope::ScopeStack;
use crate::suggest::suggest;
use pl0c_par::ast::*;
use pl0c_util::{Diagnostic, Handler, Interner, Phase, Symbol};

pub struct Analyzer<'a> {
    scopes: ScopeStack,
    interner: &'a Interner,
    handler: &'a mut Handler,
    next_proc_id: u32,
}

impl<'a> Analyzer<'a> {
    pub fn new(interner: &'a Interner, handler: &'a mut Handler) -> Self {
        Self {
            scopes: ScopeStack::new(),
            interner,
            handler,
            next_proc_id: 0,
        }
    }

    pub fn analyze(mut self, program: &mut Program) {
        self.scopes.push_level();
        self.analyze_block(&mut program.block);
        self.scopes.pop_level();
    }

    fn analyze_block(&mut self, block: &mut Block) {
        for decl in &block.consts {
            self.declare_unique(decl.name, decl.line, "constant");
            self.scopes.declare_const(decl.name, decl.value);
        }
        for decl in &block.vars {
            self.declare_unique(decl.name, decl.line, "variable");
            self.scopes.declare_var(decl.name);
        }

        // Procedures are declared one at a time, immediately before their
        // own body is analyzed: this lets a procedure call itself (it's
        // already in scope) and call any previously declared sibling, but
        // not a sibling declared later — the procedure's own entry is
        // recorded before we ever need to backpatch a call address.
        for proc in &mut block.procs {
            self.declare_unique(proc.name, proc.line, "procedure");
            let proc_id = self.next_proc_id;
            self.next_proc_id += 1;
            self.scopes
                .declare_procedure(proc.name, proc_id, proc.params.len());
            proc.proc_id = Some(proc_id);

            self.scopes.push_level();
            self.scopes.declare_params(&proc.params);
            self.analyze_block(&mut proc.block);
            self.scopes.pop_level();
        }

        self.analyze_stmt(&mut block.body);
    }

    fn declare_unique(&mut self, name: Symbol, line: pl0c_util::Line, what: &str) {
        if self.scopes.is_declared_in_current_scope(name) {
            let text = self.interner.resolve(name);
            self.handler.error(
                Phase::Semantic,
                line,
                format!("redeclaration of {what} '{text}' in the same block"),
            );
        }
    }

    fn analyze_stmt(&mut self, stmt: &mut Statement) {
        match stmt {
            Statement::Assign { target, expr, line } => {
                match self.resolve(target) {
                    Some(Resolution::Const(_)) => {
                        let text = self.interner.resolve(target.name);
                        self.handler.error(
                            Phase::Semantic,
                            *line,
                            format!("cannot assign to constant '{text}'"),
                        );
                    }
                    Some(Resolution::Procedure { .. }) => {
                        let text = self.interner.resolve(target.name);
                        self.handler.error(
                            Phase::Semantic,
                            *line,
                            format!("cannot assign to procedure '{text}'"),
                        );
                    }
                    Some(Resolution::Var { .. }) | None => {}
                }
                self.analyze_expr(expr);
            }
            Statement::Call { name, args, line } => {
                match self.resolve(name) {
                    Some(Resolution::Procedure { param_count, .. }) => {
                        if args.len() != param_count {
                            let text = self.interner.resolve(name.name);
                            self.handler.error(
                                Phase::Semantic,
                                *line,
                                format!(
                                    "procedure '{text}' expects {param_count} argument(s), found {}",
                                    args.len()
                                ),
                            );
                        }
                    }
                    Some(_) => {
                        let text = self.interner.resolve(name.name);
                        self.handler.error(
                            Phase::Semantic,
                            *line,
                            format!("'{text}' is not a procedure"),
                        );
                    }
                    None => {}
                }
                for arg in args {
                    self.analyze_expr(arg);
                }
            }
            Statement::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                let folded = self.analyze_cond(cond);
                self.analyze_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.analyze_stmt(else_branch);
                }
                match folded {
                    Some(true) if else_branch.is_some() => {
                        self.handler.warning(
                            Phase::Semantic,
                            cond.line(),
                            "condition is always true; the else branch is unreachable",
                        );
                    }
                    Some(false) => {
                        self.handler.warning(
                            Phase::Semantic,
                            cond.line(),
                            "condition is always false; the then branch is unreachable",
                        );
                    }
                    _ => {}
                }
            }
            Statement::While { cond, body, .. } => {
                let folded = self.analyze_cond(cond);
                self.analyze_stmt(body);
                if folded == Some(true) {
                    self.handler.warning(
                        Phase::Semantic,
                        cond.line(),
                        "condition is always true; this loop never terminates",
                    );
                }
            }
            Statement::Compound { stmts, .. } => {
                for s in stmts {
                    self.analyze_stmt(s);
                }
            }
            Statement::Read { names, .. } => {
                for name in names {
                    match self.resolve(name) {
                        Some(Resolution::Var { .. }) | None => {}
                        Some(_) => {
                            let text = self.interner.resolve(name.name);
                            self.handler.error(
                                Phase::Semantic,
                                name.line,
                                format!("cannot read into '{text}': not a variable"),
                            );
                        }
                    }
                }
            }
            Statement::Write { exprs, .. } => {
                for expr in exprs {
                    self.analyze_expr(expr);
                }
            }
            Statement::Empty { .. } => {}
        }
    }

    /// Returns `Some(bool)` when `cond` folds to a compile-time constant.
    fn analyze_cond(&mut self, cond: &mut Condition) -> Option<bool> {
        match cond {
            Condition::Odd { expr, .. } => self.analyze_expr(expr).map(|v| v % 2 != 0),
            Condition::Rel {
                op, left, right, ..
            } => {
                let l = self.analyze_expr(left);
                let r = self.analyze_expr(right);
                match (l, r) {
                    (Some(l), Some(r)) => Some(match op {
                        RelOp::Eq => l == r,
                        RelOp::Ne => l != r,
                        RelOp::Lt => l < r,
                        RelOp::Le => l <= r,
                        RelOp::Gt => l > r,
                        RelOp::Ge => l >= r,
                    }),
                    _ => None,
                }
            }
        }
    }

    /// Returns `Some(value)` when `expr` folds to a compile-time constant,
    /// rewriting `expr` into an `Expression::Num` carrying that value.
    fn analyze_expr(&mut self, expr: &mut Expression) -> Option<i64> {
        match expr {
            Expression::Num { value, .. } => Some(*value),
            Expression::Var(ident) => {
                let line = ident.line;
                match self.resolve(ident) {
                    Some(Resolution::Const(value)) => {
                        *expr = Expression::Num { value, line };
                        Some(value)
                    }
                    Some(Resolution::Procedure { .. }) => {
                        let text = self.interner.resolve(ident.name).to_string();
                        self.handler.error(
                            Phase::Semantic,
                            line,
                            format!("'{text}' is a procedure, not a value"),
                        );
                        None
                    }
                    Some(Resolution::Var { .. }) | None => None,
                }
            }
            Expression::Unary { op, expr: inner, line } => {
                let line = *line;
                let value = self.analyze_expr(inner)?;
                let folded = match op {
                    UnaryOp::Pos => value,
                    UnaryOp::Neg => -value,
                };
                *expr = Expression::Num { value: folded, line };
                Some(folded)
            }
            Expression::Binary {
                op, left, right, line,
            } => {
                let line = *line;
                let l = self.analyze_expr(left);
                let r = self.analyze_expr(right);
                if *op == BinOp::Div && r == Some(0) {
                    self.handler.error(
                        Phase::Semantic,
                        line,
                        "division by zero in constant expression",
                    );
                    return None;
                }
                let (l, r) = (l?, r?);
                let folded = match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                };
                *expr = Expression::Num { value: folded, line };
                Some(folded)
            }
        }
    }

    fn resolve(&mut self, ident: &mut Ident) -> Option<Resolution> {
        if let Some(res) = self.scopes.resolve(ident.name) {
            ident.resolution = Some(res);
            return Some(res);
        }
        let name_text = self.interner.resolve(ident.name);
        let candidates: Vec<&str> = self
            .scopes
            .visible_names()
            .map(|s| self.interner.resolve(s))
            .collect();
        let suggestion = suggest(name_text, candidates.into_iter());
        let mut diag = Diagnostic::error(
            Phase::Semantic,
            ident.line,
            format!("undeclared identifier '{name_text}'"),
        );
        if let Some(candidate) = suggestion {
            diag = diag.with_suggestion(candidate);
        }
        self.handler.emit(diag);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl0c_lex::Lexer;
    use pl0c_util::{Handler, Interner};

    fn analyze(src: &str) -> (Program, Handler) {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(src, &mut interner, &mut handler).tokenize();
        let mut program =
            pl0c_par::Parser::new(tokens, &mut handler, &mut interner).parse_program();
        Analyzer::new(&interner, &mut handler).analyze(&mut program);
        (program, handler)
    }

    #[test]
    fn undeclared_identifier_suggests_close_name() {
        let src = r#"
            program p;
            var counter;
            begin
              countr := 1
            end.
        "#;
        let (_, handler) = analyze(src);
        assert!(handler.has_errors());
        let msg = handler.diagnostics()[0].to_string();
        assert!(msg.contains("undeclared identifier 'countr'"));
        assert!(msg.contains("Did you mean 'counter'?"));
    }

    #[test]
    fn redeclaration_in_same_block_is_an_error() {
        let src = r#"
            program p;
            var x, x;
            begin
              x := 1
            end.
        "#;
        let (_, handler) = analyze(src);
        assert!(handler.has_errors());
    }

    #[test]
    fn call_arity_mismatch_is_an_error() {
        let src = r#"
            program p;
            var f;
            procedure fac(n);
              begin f := n end;
            begin
              call fac(1, 2)
            end.
        "#;
        let (_, handler) = analyze(src);
        assert!(handler.has_errors());
    }

    #[test]
    fn recursive_self_call_resolves() {
        let src = r#"
            program p;
            var f;
            procedure fac(n);
              begin
                if n <= 1 then f := 1 else call fac(n - 1)
              end;
            begin
              call fac(5)
            end.
        "#;
        let (_, handler) = analyze(src);
        assert!(!handler.has_errors());
    }

    #[test]
    fn constant_division_by_zero_is_an_error() {
        let src = r#"
            program p;
            const z = 0;
            var x;
            begin
              x := 10 / z
            end.
        "#;
        let (_, handler) = analyze(src);
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].to_string().contains("division by zero"));
    }

    #[test]
    fn division_by_zero_is_caught_even_with_a_non_constant_left_operand() {
        let src = r#"
            program p;
            var a;
            begin
              a := a / 0
            end.
        "#;
        let (_, handler) = analyze(src);
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].to_string().contains("division by zero"));
    }

    #[test]
    fn constant_folds_into_a_num_node() {
        let src = r#"
            program p;
            const a = 2, b = 3;
            var x;
            begin
              x := a + b * 2
            end.
        "#;
        let (program, handler) = analyze(src);
        assert!(!handler.has_errors());
        match &*program.block.body {
            Statement::Compound { stmts, .. } => match &stmts[0] {
                Statement::Assign { expr, .. } => {
                    assert!(matches!(expr, Expression::Num { value: 8, .. }));
                }
                other => panic!("expected assign, got {other:?}"),
            },
            other => panic!("expected compound, got {other:?}"),
        }
    }

    #[test]
    fn always_true_while_condition_is_flagged() {
        let src = r#"
            program p;
            var x;
            begin
              while 1 = 1 do x := x + 1
            end.
        "#;
        let (_, handler) = analyze(src);
        assert!(!handler.has_errors());
        assert_eq!(handler.warning_count(), 1);
        assert!(handler.diagnostics()[0]
            .to_string()
            .contains("never terminates"));
    }

    #[test]
    fn nested_scope_resolves_non_local_variable() {
        let src = r#"
            program p;
            var x;
            procedure inner;
              begin x := 1 end;
            begin
              call inner
            end.
        "#;
        let (program, handler) = analyze(src);
        assert!(!handler.has_errors());
        let proc = &program.block.procs[0];
        match &*proc.block.body {
            Statement::Compound { stmts, .. } => match &stmts[0] {
                Statement::Assign { target, .. } => {
                    assert!(matches!(
                        target.resolution,
                        Some(Resolution::Var { level_diff: 1, .. })
                    ));
                }
                other => panic!("expected assign, got {other:?}"),
            },
            other => panic!("expected compound, got {other:?}"),
        }
    }
}
