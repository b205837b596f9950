use std::{fs, path::Path, process::Command};

use tempfile::tempdir;

fn run_dbexpect(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dbexpect"))
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("failed to run dbexpect: {error}"))
}

fn write_file(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents)
        .unwrap_or_else(|error| panic!("failed to write {}: {error}", path.display()));
    path.to_string_lossy().into_owned()
}

#[test]
fn usage_lists_subcommands() {
    let output = run_dbexpect(&[]);

    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: dbexpect <COMMAND>"));
    assert!(stderr.contains("inspect"));
    assert!(stderr.contains("resolve"));
}

#[test]
fn inspect_prints_tables_columns_and_row_counts() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let fixture = write_file(
        tempdir.path(),
        "users-expected.yml",
        "users:\n  - id: 1\n    name: Ann\n  - id: 2\n    name: Bo\n    note: x\naudit_log: []\n",
    );

    let output = run_dbexpect(&["inspect", fixture.as_str()]);

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USERS (2 rows)"), "stdout: {stdout}");
    assert!(stdout.contains("  columns: id, name\n"), "stdout: {stdout}");
    assert!(stdout.contains("AUDIT_LOG (0 rows)"), "stdout: {stdout}");
}

#[test]
fn inspect_reports_case_folded_duplicates_unless_overwriting() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let fixture = write_file(
        tempdir.path(),
        "dup.yml",
        "users:\n  - id: 1\nUSERS:\n  - id: 2\n",
    );

    let rejected = run_dbexpect(&["inspect", fixture.as_str()]);
    assert_eq!(rejected.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&rejected.stderr);
    assert!(stderr.contains("[config]"), "stderr: {stderr}");
    assert!(stderr.contains("while loading fixture"), "stderr: {stderr}");
    assert!(stderr.contains("duplicate table"), "stderr: {stderr}");

    let accepted = run_dbexpect(&["inspect", fixture.as_str(), "--overwrite-duplicates"]);
    assert_eq!(accepted.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&accepted.stdout);
    assert!(stdout.contains("USERS (1 rows)"), "stdout: {stdout}");
}

#[test]
fn missing_input_file_is_an_io_error() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let missing = tempdir.path().join("absent.yml");
    let missing = missing.to_string_lossy().into_owned();

    let output = run_dbexpect(&["inspect", missing.as_str()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[io]"), "stderr: {stderr}");
    assert!(stderr.contains("absent.yml"), "stderr: {stderr}");
}

#[test]
fn resolve_prints_effective_checks_outer_first() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let scopes = write_file(
        tempdir.path(),
        "scopes.yml",
        r#"
- scope: class OrderServiceTest
  expectations:
    - table: orders
- scope: method places_order
  expectations:
    - value: payments.yml
      table: payments
      assertion_mode: NON_STRICT
"#,
    );

    let output = run_dbexpect(&[
        "resolve",
        scopes.as_str(),
        "--base-dir",
        "fixtures",
        "--class",
        "OrderServiceTest",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let outer = stdout
        .find("check[0] class OrderServiceTest")
        .unwrap_or_else(|| panic!("outer check missing: {stdout}"));
    let inner = stdout
        .find("check[1] method places_order")
        .unwrap_or_else(|| panic!("inner check missing: {stdout}"));
    assert!(outer < inner);
    assert!(stdout.contains("OrderServiceTest-expected.yml (convention)"));
    assert!(stdout.contains("mode: NON_STRICT\n"));
}

#[test]
fn resolve_rejects_query_without_table() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let scopes = write_file(
        tempdir.path(),
        "scopes.yml",
        "- scope: method saves_user\n  expectations:\n    - query: SELECT 1\n",
    );

    let output = run_dbexpect(&["resolve", scopes.as_str()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[config]"), "stderr: {stderr}");
    assert!(stderr.contains("method saves_user"), "stderr: {stderr}");
}

#[test]
fn overwriting_duplicates_logs_a_warning() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let fixture = write_file(
        tempdir.path(),
        "dup.yml",
        "users:\n  - id: 1\nUSERS:\n  - id: 2\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_dbexpect"))
        .args(["inspect", fixture.as_str(), "--overwrite-duplicates"])
        .env("RUST_LOG", "warn")
        .env("NO_COLOR", "1")
        .output()
        .unwrap_or_else(|error| panic!("failed to run dbexpect: {error}"));

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARN"), "stderr: {stderr}");
    assert!(
        stderr.contains("duplicate table after case folding"),
        "stderr: {stderr}"
    );
}

#[test]
fn inspect_output_is_one_line_per_field() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let fixture = write_file(
        tempdir.path(),
        "orders.yml",
        "orders:\n  - id: 1\n    total: 9\npayments: []\n",
    );

    let output = run_dbexpect(&["inspect", fixture.as_str()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ORDERS (1 rows)\n  columns: id, total\nPAYMENTS (0 rows)\n  columns: \n"
    );
}
