//! Integration tests for report generation (`oplogger parse`)

use std::fs;

use crate::helpers::{write_log, Workspace};

fn tmux_meta() -> Vec<(&'static str, &'static str)> {
    vec![
        ("type", "tmux"),
        ("started", "2025-02-06 10:15:00"),
        ("cwd", "/home/op"),
        ("pane_id", "%3"),
        ("window", "0"),
        ("pane", "1"),
    ]
}

/// A tmux pane with colored prompts and a plain terminal log.
fn seed_session(ws: &Workspace) -> std::path::PathBuf {
    let dir = ws.logs_dir();
    write_log(
        &dir,
        "pane_w0_p1_20250206_101500.log",
        &tmux_meta(),
        b"\x1b[1;32mop@kali\x1b[0m:~$ nmap -sV 10.0.0.1\r\n\
          22/tcp open  ssh\r\n\
          80/tcp open  http\r\n\
          \x1b[1;32mop@kali\x1b[0m:~$ ls\r\n",
    );
    write_log(
        &dir,
        "terminal_20250206_101700.log",
        &[("type", "plain"), ("started", "2025-02-06T10:17:00+00:00")],
        b"$ whoamx\x08\x08mi\r\nop\r\n",
    );
    dir
}

// ============================================================================
// Report Generation
// ============================================================================

#[test]
fn parse_writes_both_reports() {
    let ws = Workspace::new();
    let dir = seed_session(&ws);

    let (_stdout, stderr, exit_code) = ws.run(&["parse"]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stderr.contains("session_log.md"));
    assert!(stderr.contains("commands_only.md"));

    let report = fs::read_to_string(dir.join("session_log.md")).unwrap();
    assert!(report.starts_with("# Session Log\n"));
    assert!(report.contains("from 2 log file(s)"));
    assert!(report.contains("### 🔴 `nmap -sV 10.0.0.1`"));
    assert!(report.contains("### ▸ `ls`"));
    assert!(report.contains("### ▸ `whoami`"));
    assert!(report.contains("22/tcp open  ssh\n80/tcp open  http"));
    assert!(!report.contains('\x1b'));
    assert!(!report.contains('\r'));
}

#[test]
fn commands_digest_lists_panes_in_file_order() {
    let ws = Workspace::new();
    let dir = seed_session(&ws);

    let (_stdout, stderr, exit_code) = ws.run(&["parse"]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    let digest = fs::read_to_string(dir.join("commands_only.md")).unwrap();
    insta::assert_snapshot!(digest.trim_end(), @r"
    # Commands

    ## Window 0 — Pane 1

    🔴 `nmap -sV 10.0.0.1`
    - `ls`

    ## Terminal Session

    - `whoami`
    ");
}

#[test]
fn parse_is_repeatable() {
    let ws = Workspace::new();
    let dir = seed_session(&ws);

    assert_eq!(ws.run(&["parse"]).2, 0);
    let first = fs::read(dir.join("session_log.md")).unwrap();
    assert_eq!(ws.run(&["parse"]).2, 0);
    let second = fs::read(dir.join("session_log.md")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn parse_accepts_explicit_dir_and_output() {
    let ws = Workspace::new();
    let dir = seed_session(&ws);
    let out = ws.cwd.join("reports").join("engagement.md");

    let (_stdout, stderr, exit_code) = ws.run(&[
        "parse",
        dir.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(out.exists());
    assert!(!dir.join("session_log.md").exists());
    assert!(dir.join("commands_only.md").exists());
}

#[test]
fn long_output_is_folded() {
    let ws = Workspace::new();
    let dir = ws.logs_dir();
    let mut body = String::from("$ seq 300\n");
    for i in 1..=300 {
        body.push_str(&format!("{}\n", i));
    }
    write_log(&dir, "terminal_1.log", &[("type", "plain")], body.as_bytes());

    assert_eq!(ws.run(&["parse"]).2, 0);

    let report = fs::read_to_string(dir.join("session_log.md")).unwrap();
    assert!(report.contains("<summary>Output (300 lines)</summary>"));
    assert!(report.contains("... [150 lines omitted] ..."));
    assert!(report.contains("\n100\n"));
    assert!(!report.contains("\n200\n"));
    assert!(report.contains("\n300\n"));
}

#[test]
fn headerless_log_is_still_parsed() {
    let ws = Workspace::new();
    let dir = ws.logs_dir();
    fs::write(dir.join("old.log"), "$ id\nuid=0(root)\n").unwrap();

    assert_eq!(ws.run(&["parse"]).2, 0);

    let report = fs::read_to_string(dir.join("session_log.md")).unwrap();
    assert!(report.contains("## Old"));
    assert!(report.contains("uid=0(root)"));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn empty_dir_warns_and_succeeds() {
    let ws = Workspace::new();
    let dir = ws.logs_dir();

    let (_stdout, stderr, exit_code) = ws.run(&["parse"]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("No log files found"));
    assert!(!dir.join("session_log.md").exists());
}

#[test]
fn missing_dir_fails() {
    let ws = Workspace::new();

    let (_stdout, stderr, exit_code) = ws.run(&["parse", "does-not-exist"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Not found"));
}

#[test]
fn broken_log_is_skipped_with_warning() {
    let ws = Workspace::new();
    let dir = seed_session(&ws);
    fs::write(dir.join("broken.log"), "===OPLOGGER_PANE_START===\ntype: tmux\n").unwrap();

    let (_stdout, stderr, exit_code) = ws.run(&["parse"]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("broken.log"));
    let report = fs::read_to_string(dir.join("session_log.md")).unwrap();
    assert!(report.contains("from 2 log file(s)"));
}

#[test]
fn only_broken_logs_fail() {
    let ws = Workspace::new();
    let dir = ws.logs_dir();
    fs::write(dir.join("broken.log"), "===OPLOGGER_PANE_START===\n").unwrap();

    let (_stdout, stderr, exit_code) = ws.run(&["parse"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("No logs could be parsed"));
    assert!(!dir.join("session_log.md").exists());
}
