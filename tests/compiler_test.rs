use std::{fs, path::PathBuf, process::Command};

use rstest::*;
use tempfile::tempdir;

use warlang::{translate, EmitOptions};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture(name)).unwrap()
}

#[rstest]
#[case::hello("hello")]
#[case::loops("loop")]
#[case::assignment("assignment")]
fn test_golden(#[case] src: &str) {
    let source = read_fixture(&format!("{src}.war"));
    let translation = translate(&source, &EmitOptions::default()).unwrap();

    let diagnostics: Vec<String> = translation
        .diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect();
    assert_eq!(diagnostics, Vec::<String>::new());
    assert_eq!(
        translation.output.as_deref(),
        Some(read_fixture(&format!("{src}.py")).as_str())
    );
}

#[rstest]
fn test_type_mismatch_blocks_generation() {
    let translation = translate(&read_fixture("mismatch.war"), &EmitOptions::default()).unwrap();
    assert!(translation.has_errors());
    assert!(translation.output.is_none());
    let errors: Vec<String> = translation.errors().map(|e| e.to_string()).collect();
    assert_eq!(
        errors,
        vec!["[Semantic Error] Type Mismatch: Cannot assign 'soldier' (int) to 'intel' (string) at line 2"]
    );
}

#[rstest]
fn test_every_stage_reports() {
    let translation = translate(&read_fixture("errors.war"), &EmitOptions::default()).unwrap();
    let errors: Vec<String> = translation.errors().map(|e| e.to_string()).collect();
    assert_eq!(
        errors,
        vec![
            "[Lexical Error] Invalid number format '12abc' at line 2, column 17",
            "[Lexical Error] Unexpected symbol '@' at line 3, column 17",
            "[Syntax Error] Expected expression but found SEMICOLON at line 2",
            "[Syntax Error] Expected SEMICOLON but found FOR at line 4",
            "[Semantic Error] Variable 'i' not declared at line 7",
        ]
    );
    assert!(translation.output.is_none());
}

#[rstest]
fn test_warnings_do_not_block_generation() {
    let translation = translate(
        "battle() {\n    soldier x;\n    shout(x);\n}\n",
        &EmitOptions::default(),
    )
    .unwrap();
    let warnings: Vec<String> = translation.warnings().map(|w| w.to_string()).collect();
    assert_eq!(
        warnings,
        vec!["[Semantic Warning] Variable 'x' used but might not be initialized at line 3"]
    );
    assert_eq!(
        translation.output.as_deref(),
        Some("if __name__ == \"__main__\":\n    x = None\n    print(x)\n")
    );
}

#[rstest]
fn test_independent_runs() {
    let source = read_fixture("loop.war");
    let first = translate(&source, &EmitOptions::default()).unwrap();
    let second = translate(&source, &EmitOptions::default()).unwrap();
    assert_eq!(first.output, second.output);
    assert_eq!(first.tokens, second.tokens);
}

#[rstest]
fn test_cli_writes_output() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("hello.py");
    let output = Command::new(env!("CARGO_BIN_EXE_warlang"))
        .arg(fixture("hello.war"))
        .arg("--output")
        .arg(&dest)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read_to_string(dest).unwrap(), read_fixture("hello.py"));
}

#[rstest]
fn test_cli_reports_errors() {
    let output = Command::new(env!("CARGO_BIN_EXE_warlang"))
        .arg(fixture("mismatch.war"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(
        "[Semantic Error] Type Mismatch: Cannot assign 'soldier' (int) to 'intel' (string) at line 2"
    ));
}

#[rstest]
fn test_cli_dumps_tokens() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("tiny.war");
    fs::write(&src, "battle() { }").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_warlang"))
        .arg(&src)
        .arg("--tokens")
        .arg("--indent")
        .arg("2")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Type: PROGRAM_START"));
    assert!(stdout.ends_with("if __name__ == \"__main__\":\n  pass\n"));
}

#[rstest]
fn test_cli_dumps_ast() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("tiny.war");
    let dest = dir.path().join("tiny.py");
    fs::write(&src, "battle() { shout(1); }").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_warlang"))
        .arg(&src)
        .arg("--ast")
        .arg("-o")
        .arg(&dest)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Program\n  MainFunction\n    Block\n      StatementList\n        OutputStmt\n          Number: 1\n"
    );
    assert_eq!(
        fs::read_to_string(dest).unwrap(),
        "if __name__ == \"__main__\":\n    print(1)\n"
    );
}
