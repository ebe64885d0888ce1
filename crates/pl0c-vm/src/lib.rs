//! pl0c-vm - The P-Code stack machine.
//!
//! Executes the `Code` produced by `pl0c_gen` exactly as laid out in the
//! activation-record model: no dynamic typing, no heap, one flat `Vec<i64>`
//! as the entire runtime store.

mod error;
mod io;
mod vm;

pub use error::RuntimeError;
pub use io::{FixedIoPort, IoPort};
pub use vm::{Vm, DEFAULT_MAX_STACK};

#[cfg(test)]
mod tests {
    use super::*;
    use pl0c_gen::CodeGen;
    use pl0c_lex::Lexer;
    use pl0c_sem::Analyzer;
    use pl0c_util::{Handler, Interner};

    fn compile_and_run(src: &str, input: impl IntoIterator<Item = i64>) -> Vec<i64> {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(src, &mut interner, &mut handler).tokenize();
        let mut program =
            pl0c_par::Parser::new(tokens, &mut handler, &mut interner).parse_program();
        Analyzer::new(&interner, &mut handler).analyze(&mut program);
        assert!(!handler.has_errors(), "fixture failed to analyze cleanly");
        let code = CodeGen::generate(&program);
        let mut io = FixedIoPort::new(input);
        Vm::new(&code).run(&mut io).expect("fixture should run cleanly");
        io.output
    }

    #[test]
    fn gcd_of_12_and_18_is_6() {
        let src = r#"
            program gcd;
            var x, y;
            begin
              read(x, y);
              while x <> y do
                if x < y then y := y - x
                else x := x - y;
              write(x)
            end.
        "#;
        assert_eq!(compile_and_run(src, [12, 18]), vec![6]);
    }

    #[test]
    fn recursive_factorial_of_5_is_120() {
        let src = r#"
            program fact;
            var f;
            procedure fac(n);
              begin
                if n = 0 then f := 1
                else begin call fac(n - 1); f := n * f end
              end;
            begin
              call fac(5);
              write(f)
            end.
        "#;
        assert_eq!(compile_and_run(src, []), vec![120]);
    }

    #[test]
    fn nested_scope_reads_a_non_local_variable() {
        let src = r#"
            program p;
            var x;
            procedure outer;
              var y;
              procedure inner;
                begin x := y + 1 end;
              begin
                y := 0;
                call inner
              end;
            begin
              call outer;
              write(x)
            end.
        "#;
        assert_eq!(compile_and_run(src, []), vec![1]);
    }

    #[test]
    fn recursion_to_depth_32_fits_the_default_stack() {
        let src = r#"
            program p;
            var result;
            procedure countdown(n);
              begin
                if n = 0 then result := 1
                else call countdown(n - 1)
              end;
            begin
              call countdown(40);
              write(result)
            end.
        "#;
        assert_eq!(compile_and_run(src, []), vec![1]);
    }

    #[test]
    fn division_by_zero_at_runtime_is_a_runtime_error() {
        let src = r#"
            program p;
            var x, y, z;
            begin
              read(x, y);
              z := x / y;
              write(z)
            end.
        "#;
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(src, &mut interner, &mut handler).tokenize();
        let mut program =
            pl0c_par::Parser::new(tokens, &mut handler, &mut interner).parse_program();
        Analyzer::new(&interner, &mut handler).analyze(&mut program);
        assert!(!handler.has_errors());
        let code = CodeGen::generate(&program);
        let mut io = FixedIoPort::new([10, 0]);
        let err = Vm::new(&code).run(&mut io).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero));
    }

    #[test]
    fn unbounded_recursion_overflows_the_stack() {
        let src = r#"
            program p;
            procedure loop;
              begin call loop end;
            begin
              call loop
            end.
        "#;
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(src, &mut interner, &mut handler).tokenize();
        let mut program =
            pl0c_par::Parser::new(tokens, &mut handler, &mut interner).parse_program();
        Analyzer::new(&interner, &mut handler).analyze(&mut program);
        assert!(!handler.has_errors());
        let code = CodeGen::generate(&program);
        let mut io = FixedIoPort::new([]);
        let err = Vm::with_max_stack(&code, 64).run(&mut io).unwrap_err();
        assert!(matches!(err, RuntimeError::StackOverflow { max: 64 }));
    }

    #[test]
    fn odd_condition_is_true_for_negative_odd_numbers() {
        let src = r#"
            program p;
            var x;
            begin
              x := -3;
              if odd x then write(1) else write(0)
            end.
        "#;
        assert_eq!(compile_and_run(src, []), vec![1]);
    }
}
