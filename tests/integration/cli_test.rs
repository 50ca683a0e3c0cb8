//! Integration tests for top-level CLI behavior

use assert_cmd::Command;
use predicates::prelude::*;

use crate::helpers::Workspace;

#[test]
fn no_arguments_prints_help() {
    let ws = Workspace::new();
    let (_stdout, stderr, exit_code) = ws.run(&[]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("Usage"));
    assert!(stderr.contains("start"));
    assert!(stderr.contains("parse"));
}

#[test]
fn help_lists_subcommands() {
    let ws = Workspace::new();
    Command::from_std(ws.command())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_starts_with_package_version() {
    let ws = Workspace::new();
    let (stdout, _stderr, exit_code) = ws.run(&["--version"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with(&format!("oplogger {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn completions_for_bash() {
    let ws = Workspace::new();
    Command::from_std(ws.command())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_oplogger"));
}

#[test]
fn completions_reject_unknown_shell() {
    let ws = Workspace::new();
    Command::from_std(ws.command())
        .args(["completions", "tcsh"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let ws = Workspace::new();
    let (_stdout, stderr, exit_code) = ws.run(&["record"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("unrecognized subcommand"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let ws = Workspace::new();
    let (stdout, _stderr, exit_code) = ws.run(&["config", "show"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[capture]"));
    assert!(stdout.contains("logs_dir = \"oplogs\""));
    assert!(stdout.contains("fold_threshold = 200"));
}

#[test]
fn config_show_reads_config_file() {
    let ws = Workspace::new();
    std::fs::write(
        ws.base.join("config.toml"),
        "[capture]\nlogs_dir = \"engagement\"\n",
    )
    .unwrap();

    let (stdout, _stderr, exit_code) = ws.run(&["config", "show"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("logs_dir = \"engagement\""));
}

#[test]
fn invalid_config_is_reported() {
    let ws = Workspace::new();
    std::fs::write(ws.base.join("config.toml"), "[capture\n").unwrap();

    let (_stdout, stderr, exit_code) = ws.run(&["config", "show"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("config.toml"));
}

#[test]
fn config_tools_lists_default_allowlist() {
    let ws = Workspace::new();
    let (stdout, _stderr, exit_code) = ws.run(&["config", "tools"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("nmap"));
}
