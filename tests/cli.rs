use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn llisp() -> Command {
    Command::cargo_bin("llisp").unwrap()
}

fn program(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

#[test]
fn runs_a_file() {
    let file = program("(def (fact n) (if (eq n 0) 1 (* n (fact (- n 1)))))\n(print (fact 10))\n");
    llisp()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout("3628800\n");
}

#[test]
fn echo_writes_without_newline() {
    let file = program("(echo \"hello, \")\n(echo \"world\")\n");
    llisp()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout("hello, world");
}

#[test]
fn evaluates_an_expression() {
    llisp()
        .args(["run", "--expr", "(/ 10 4)"])
        .assert()
        .success()
        .stdout("2.5\n");
}

#[test]
fn prelude_is_loaded_by_default() {
    llisp()
        .args(["run", "--expr", "(toint \"9029\")"])
        .assert()
        .success()
        .stdout("9029\n");
}

#[test]
fn prelude_can_be_disabled() {
    llisp()
        .args(["--no-prelude", "run", "--expr", "(toint \"1\")"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Undefined symbol: toint"));
}

#[test]
fn undefined_symbol_fails() {
    let file = program("(var x 1)\n(print y)\n");
    llisp()
        .arg("run")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Undefined symbol: y"));
}

#[test]
fn missing_file_fails() {
    llisp()
        .args(["run", "/definitely/not/here.lisp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn runaway_recursion_reports_stack_exhaustion() {
    llisp()
        .args([
            "--max-depth",
            "100",
            "run",
            "--expr",
            "(def (down n) (down (+ n 1))) (down 0)",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Stack exhausted"));
}

#[test]
fn max_depth_reads_the_environment() {
    llisp()
        .env("LLISP_MAX_DEPTH", "5")
        .args(["run", "--expr", "(def (down n) (down (+ n 1))) (down 0)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deeper than 5"));
}

#[test]
fn project_euler_demos() {
    let demos = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/project_euler");
    llisp()
        .arg("run")
        .arg(format!("{}/problem1.lisp", demos))
        .assert()
        .success()
        .stdout("233168\n");
    llisp()
        .arg("run")
        .arg(format!("{}/problem2.lisp", demos))
        .assert()
        .success()
        .stdout("4613732\n");
}
