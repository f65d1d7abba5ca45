//! End-to-end tests for the validate-skills binary

use std::path::Path;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_validate-skills");

fn write_skill(root: &Path, name: &str, content: &str) {
    let dir = root.join("skills").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("SKILL.md"), content).unwrap();
}

fn skill_md(name: &str, license: &str, body: &str) -> String {
    format!(
        "---\nname: {name}\ndescription: Storefront search and filtering guidance.\nlicense: {license}\nmetadata:\n  author: ariessolutionsio\n  version: \"2.1.0\"\n---\n\n# {name}\n\n{body}"
    )
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SKILLCHECK_ROOT")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_valid_corpus_exits_zero() {
    let temp = tempfile::tempdir().unwrap();
    write_skill(temp.path(), "search", &skill_md("search", "MIT", "Body\n"));

    let output = run(&[temp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("--- search ---"));
    assert!(out.trim_end().ends_with("PASSED: All skills valid"));
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_errors_exit_one_and_go_to_stderr() {
    let temp = tempfile::tempdir().unwrap();
    write_skill(temp.path(), "search", &skill_md("search", "GPL-3.0", "Body\n"));
    write_skill(
        temp.path(),
        "zzz",
        &skill_md("zzz", "MIT", "See references/setup.md\n"),
    );

    let output = run(&[temp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("ERROR: license must be 'MIT', got 'GPL-3.0'"));
    assert!(err.contains("ERROR: Broken reference link: references/setup.md"));
    assert!(stdout(&output).contains("FAILED: 2 error(s) found"));
}

#[test]
fn test_warnings_do_not_fail() {
    let temp = tempfile::tempdir().unwrap();
    write_skill(temp.path(), "search", &skill_md("search", "MIT", "Body\n"));
    let refs = temp.path().join("skills/search/references");
    std::fs::create_dir_all(&refs).unwrap();
    std::fs::write(refs.join("huge.md"), "x\n".repeat(501)).unwrap();

    let output = run(&[temp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("WARN: references/huge.md is 501 lines"));
}

#[test]
fn test_json_format() {
    let temp = tempfile::tempdir().unwrap();
    write_skill(temp.path(), "search", &skill_md("search", "BSD", "Body\n"));

    let output = run(&[temp.path().to_str().unwrap(), "--format", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("\"passed\": false"));
    assert!(out.contains("\"kind\": \"invalid-license\""));
    assert!(!out.contains("--- search ---"));
}

#[test]
fn test_root_from_environment() {
    let temp = tempfile::tempdir().unwrap();
    write_skill(temp.path(), "search", &skill_md("search", "MIT", "Body\n"));

    let output = Command::new(BIN)
        .env_remove("RUST_LOG")
        .env("SKILLCHECK_ROOT", temp.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_missing_skills_directory_exits_two() {
    let temp = tempfile::tempdir().unwrap();

    let output = run(&[temp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Directory does not exist"));
}
