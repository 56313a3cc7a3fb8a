//! Binary-level tests: the CLI writes `out.s`, exits non-zero on any
//! fatal error, and prints a single `[ERROR]` diagnostic on stdout.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn compiles_to_default_output_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("program.c"), "void main() { print(42); }").unwrap();

    Command::cargo_bin("toyccomp")
        .unwrap()
        .current_dir(dir.path())
        .arg("program.c")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let assembly = fs::read_to_string(dir.path().join("out.s")).unwrap();
    assert!(assembly.contains("global main"));
    assert!(assembly.contains("extern print"));
}

#[test]
fn explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("program.c");
    let output = dir.path().join("program.s");
    fs::write(&source, "void main() { }").unwrap();

    Command::cargo_bin("toyccomp")
        .unwrap()
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn compile_error_reports_and_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.c");
    fs::write(&source, "void main() { y = 1; }").unwrap();

    Command::cargo_bin("toyccomp")
        .unwrap()
        .current_dir(dir.path())
        .arg(&source)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("[ERROR][EXPR]"));

    assert!(!dir.path().join("out.s").exists());
}

#[test]
fn missing_input_file() {
    Command::cargo_bin("toyccomp")
        .unwrap()
        .arg("does-not-exist.c")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("[ERROR][SCANNER]"));
}

#[test]
fn lex_error_carries_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.c");
    fs::write(&source, "void main() {\n  a ~ b;\n}").unwrap();

    Command::cargo_bin("toyccomp")
        .unwrap()
        .arg(&source)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ERROR][SCANNER] line 2"));
}
