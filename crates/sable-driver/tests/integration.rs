//! Integration tests for the `sable` binary.
//!
//! Each test serializes a resolved program tree to a temp directory, runs
//! `sable check` over it and inspects the exit status and output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

use sable_ast::{Binding, BindingKind, Expr, Ident, Literal, Node, Program, Span, Stmt};

fn sable_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sable"))
}

fn temp_dir() -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("sable_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

fn write_tree(dir: &Path, program: &Program) -> PathBuf {
    let path = dir.join("tree.json");
    let json = serde_json::to_string(program).expect("Failed to serialize tree");
    fs::write(&path, json).expect("Failed to write tree");
    path
}

fn run(args: &[&str], tree: &Path) -> Output {
    Command::new(sable_binary())
        .arg("check")
        .arg(tree)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run sable")
}

fn span(start: usize, end: usize) -> Span {
    Span::new(start, end, 1, start as u32 + 1)
}

fn number(value: f64, start: usize, end: usize) -> Node<Expr> {
    Node::new(Expr::Literal(Literal::Number(value)), span(start, end))
}

fn program(body: Vec<Node<Stmt>>) -> Program {
    Program {
        file: "main.sbl".to_string(),
        body,
        span: span(0, 40),
    }
}

/// (let* ((x 1)) (< x 2))
fn clean_program() -> Program {
    let compare = Node::new(
        Expr::Call {
            callee: Box::new(Node::new(Expr::Ident(Ident::new("<")), span(15, 16))),
            args: vec![
                Node::new(Expr::Ident(Ident::resolved("x", 0)), span(17, 18)),
                number(2.0, 19, 20),
            ],
        },
        span(14, 21),
    );
    program(vec![Node::new(
        Stmt::Let {
            kind: BindingKind::Let,
            bindings: vec![Binding {
                name: Node::new(Ident::resolved("x", 0), span(8, 9)),
                type_annotation: None,
                init: number(1.0, 10, 11),
            }],
            body: vec![Node::new(Stmt::Expr(compare), span(14, 21))],
        },
        span(0, 22),
    )])
}

/// (if 1 2)
fn bad_condition_program() -> Program {
    let test = number(1.0, 4, 5);
    let consequent = Node::new(Stmt::Expr(number(2.0, 6, 7)), span(6, 7));
    program(vec![Node::new(
        Stmt::Expr(Node::new(
            Expr::If {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: None,
            },
            span(0, 8),
        )),
        span(0, 8),
    )])
}

#[test]
fn test_clean_program_passes() {
    let dir = temp_dir();
    let tree = write_tree(&dir, &clean_program());

    let output = run(&[], &tree);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Type check passed!"));
}

#[test]
fn test_diagnostic_fails_with_location() {
    let dir = temp_dir();
    let tree = write_tree(&dir, &bad_condition_program());

    let output = run(&[], &tree);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("main.sbl:1:5: condition must be boolean, found 1"),
        "stderr: {}",
        stderr
    );
    assert!(stderr.contains("1 type error"));
}

#[test]
fn test_source_renders_report() {
    let dir = temp_dir();
    let tree = write_tree(&dir, &bad_condition_program());
    let source = dir.join("main.sbl");
    fs::write(&source, "(if 1 2)\n").expect("Failed to write source");

    let output = run(&["--source", source.to_str().unwrap()], &tree);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Type error"), "stderr: {}", stderr);
    assert!(stderr.contains("condition must be boolean, found 1"));
}

#[test]
fn test_json_format() {
    let dir = temp_dir();
    let tree = write_tree(&dir, &bad_condition_program());

    let output = run(&["--format", "json"], &tree);
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");

    assert!(!output.status.success());
    assert_eq!(report["program"]["file"], "main.sbl");
    assert!(report["type_table"].is_array());

    let diagnostic = &report["diagnostics"][0];
    assert_eq!(diagnostic["message"], "condition must be boolean, found 1");
    assert_eq!(diagnostic["phase"], "typeCheck");
    assert_eq!(diagnostic["location"]["line"], 1);
    assert_eq!(diagnostic["location"]["column"], 5);
}

#[test]
fn test_json_records_types_on_nodes() {
    let dir = temp_dir();
    let tree = write_tree(&dir, &clean_program());

    let output = run(&["--format", "json"], &tree);
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");

    assert!(output.status.success());
    let let_stmt = &report["program"]["body"][0];
    let id = let_stmt["ty"].as_u64().expect("statement has no type id") as usize;
    assert_eq!(report["type_table"][id]["kind"], "boolean");
}

#[test]
fn test_dump_types() {
    let dir = temp_dir();
    let tree = write_tree(&dir, &clean_program());

    let output = run(&["--dump-types"], &tree);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.lines().any(|line| line == "#0: 1"), "stdout: {}", stdout);
    assert!(stdout.contains(": boolean"));
}

#[test]
fn test_missing_tree() {
    let dir = temp_dir();
    let output = run(&[], &dir.join("absent.json"));
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("cannot read"), "stderr: {}", stderr);
}

#[test]
fn test_missing_source_uses_error_prefix() {
    let dir = temp_dir();
    let tree = write_tree(&dir, &clean_program());
    let missing = dir.join("absent.sbl");

    let output = run(&["--source", missing.to_str().unwrap()], &tree);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.starts_with("error: cannot read "), "stderr: {}", stderr);
}

#[test]
fn test_malformed_tree() {
    let dir = temp_dir();
    let path = dir.join("tree.json");
    fs::write(&path, "{ \"file\": [] }").expect("Failed to write tree");

    let output = run(&[], &path);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("malformed program tree"), "stderr: {}", stderr);
}
