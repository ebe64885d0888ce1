//! End-to-end tests driving the built `pl0c` binary against real source
//! files, covering the seed scenarios the pipeline is built around.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp source file");
    write!(file, "{contents}").expect("failed to write temp source file");
    file
}

#[test]
fn gcd_sample_prints_12() {
    let src = source_file(
        r#"
        program gcd;
        var x, y;
        begin
          x := 36;
          y := 24;
          while x <> y do
            if x < y then y := y - x
            else x := x - y;
          write(x)
        end.
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .success()
        .stdout("12\n");
}

#[test]
fn recursive_factorial_sample_prints_120() {
    let src = source_file(
        r#"
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
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .success()
        .stdout("120\n");
}

#[test]
fn nested_scope_call_prints_1() {
    let src = source_file(
        r#"
        program p;
        var x;
        procedure outer;
          var y;
          procedure inner;
            begin x := 1 end;
          begin
            call inner
          end;
        begin
          call outer;
          write(x)
        end.
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn undeclared_identifier_exits_with_compile_error_and_suggests_a_fix() {
    let src = source_file(
        r#"
        program p;
        var counter;
        begin
          countr := 1
        end.
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("undeclared identifier 'countr'"))
        .stderr(predicate::str::contains("Did you mean 'counter'?"));
}

#[test]
fn constant_division_by_zero_exits_with_compile_error() {
    let src = source_file(
        r#"
        program p;
        const z = 0;
        var x;
        begin
          x := 10 / z
        end.
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn recursion_to_depth_32_runs_to_completion_against_the_default_stack() {
    let src = source_file(
        r#"
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
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn division_by_zero_with_non_constant_left_operand_exits_with_compile_error() {
    let src = source_file(
        r#"
        program p;
        var a;
        begin
          a := a / 0
        end.
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn syntax_error_recovers_and_still_exits_with_compile_error() {
    let src = source_file(
        r#"
        program p;
        var x
        begin
          x := 1
        end.
        "#,
    );

    Command::cargo_bin("pl0c")
        .unwrap()
        .arg(src.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[Syntax Error]"));
}

#[test]
fn missing_source_file_exits_with_io_error() {
    Command::cargo_bin("pl0c")
        .unwrap()
        .arg("/does/not/exist/nowhere.pl0")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("could not read"));
}
