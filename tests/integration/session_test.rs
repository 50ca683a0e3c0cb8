//! Integration tests for the session lifecycle (start/stop/status)
//!
//! Live captures need a terminal or a tmux server, so these tests seed the
//! session marker directly and exercise what `stop` and `status` do with it.

use std::fs;
use std::process::Command;

use crate::helpers::{write_log, Workspace};

/// PID of a process that has already exited and been reaped.
fn dead_pid() -> u32 {
    let mut child = Command::new("true").spawn().expect("Failed to spawn true");
    let pid = child.id();
    child.wait().unwrap();
    pid
}

fn seed_logs(ws: &Workspace) -> std::path::PathBuf {
    let dir = ws.logs_dir();
    write_log(
        &dir,
        "terminal_20250206_101500.log",
        &[("type", "plain"), ("started", "2025-02-06T10:15:00+00:00")],
        b"$ gobuster dir -u http://10.0.0.1\r\n/admin (Status: 301)\r\n$ exit\r\n",
    );
    dir
}

fn plain_state(dir: &std::path::Path) -> String {
    serde_json::json!({
        "dir": dir,
        "type": "plain",
        "started": "2025-02-06T10:15:00+00:00",
    })
    .to_string()
}

// ============================================================================
// Status
// ============================================================================

#[test]
fn status_without_session() {
    let ws = Workspace::new();
    let (_stdout, stderr, exit_code) = ws.run(&["status"]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("No active session"));
}

#[test]
fn status_shows_session_details() {
    let ws = Workspace::new();
    let dir = seed_logs(&ws);
    ws.write_state(&plain_state(&dir));
    fs::write(dir.join(".oplogger.pid"), "4242\n").unwrap();

    let (_stdout, stderr, exit_code) = ws.run(&["status"]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains(&dir.display().to_string()));
    assert!(stderr.contains("plain"));
    assert!(stderr.contains("Shell PID"));
    assert!(stderr.contains("4242"));
    assert!(stderr.contains("Log files  1"));
}

// ============================================================================
// Start
// ============================================================================

#[test]
fn start_refuses_while_active() {
    let ws = Workspace::new();
    let dir = seed_logs(&ws);
    ws.write_state(&plain_state(&dir));

    let (_stdout, stderr, exit_code) = ws.run(&["start"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Already logging"));
    assert!(ws.base.join("session.json").exists());
}

#[test]
fn start_outside_terminal_fails_and_clears_state() {
    let ws = Workspace::new();

    let (_stdout, stderr, exit_code) = ws.run(&["start"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("terminal"), "stderr: {}", stderr);
    assert!(!ws.base.join("session.json").exists());
}

// ============================================================================
// Stop
// ============================================================================

#[test]
fn stop_without_session_fails() {
    let ws = Workspace::new();
    let (_stdout, stderr, exit_code) = ws.run(&["stop"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("No active session"));
}

#[test]
fn stop_with_ended_shell_writes_report() {
    let ws = Workspace::new();
    let dir = seed_logs(&ws);
    ws.write_state(&plain_state(&dir));
    fs::write(dir.join(".oplogger.pid"), dead_pid().to_string()).unwrap();

    let (_stdout, stderr, exit_code) = ws.run(&["stop"]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stderr.contains("already ended"));
    let report = fs::read_to_string(dir.join("session_log.md")).unwrap();
    assert!(report.contains("### 🔴 `gobuster dir -u http://10.0.0.1`"));
    assert!(!ws.base.join("session.json").exists());
}

#[test]
fn stop_without_pid_file_writes_report() {
    let ws = Workspace::new();
    let dir = seed_logs(&ws);
    ws.write_state(&plain_state(&dir));

    let (_stdout, stderr, exit_code) = ws.run(&["stop"]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("No PID found"));
    assert!(dir.join("session_log.md").exists());
    assert!(dir.join("commands_only.md").exists());
    assert!(!ws.base.join("session.json").exists());
}

#[test]
fn stop_tmux_session_tolerates_missing_server() {
    let ws = Workspace::new();
    let dir = seed_logs(&ws);
    let state = serde_json::json!({
        "dir": dir,
        "type": "tmux",
        "started": "2025-02-06T10:15:00+00:00",
        "tmux_session": "oplogger-test-no-such-session",
    });
    ws.write_state(&state.to_string());

    let (_stdout, stderr, exit_code) = ws.run(&["stop"]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(dir.join("session_log.md").exists());
    assert!(!ws.base.join("session.json").exists());
}

#[test]
fn stop_clears_corrupt_state() {
    let ws = Workspace::new();
    ws.write_state("{not json");

    let (_stdout, stderr, exit_code) = ws.run(&["stop"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("unreadable"));
    assert!(!ws.base.join("session.json").exists());
}
