//! Shared helpers for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Scratch workspace: a base dir for oplogger's own files and a working dir.
pub struct Workspace {
    _root: TempDir,
    pub base: PathBuf,
    pub cwd: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let base = root.path().join("base");
        let cwd = root.path().join("work");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(&cwd).unwrap();
        Self {
            _root: root,
            base,
            cwd,
        }
    }

    /// Default log directory under the working dir, created.
    pub fn logs_dir(&self) -> PathBuf {
        let dir = self.cwd.join("oplogs");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Base command with an isolated environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_oplogger"));
        cmd.current_dir(&self.cwd)
            .env("OPLOGGER_DIR", &self.base)
            .env("NO_COLOR", "1")
            .env_remove("TMUX")
            .env_remove("OPLOGGER_LOG");
        cmd
    }

    /// Run oplogger and capture (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to execute oplogger");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    /// Write a session marker as `oplogger start` would.
    pub fn write_state(&self, json: &str) {
        fs::write(self.base.join("session.json"), json).unwrap();
    }
}

/// Write a log file with a header built from `meta` and the raw `body`.
pub fn write_log(dir: &Path, name: &str, meta: &[(&str, &str)], body: &[u8]) -> PathBuf {
    let mut raw = String::from("===OPLOGGER_PANE_START===\n");
    for (key, value) in meta {
        raw.push_str(&format!("{}: {}\n", key, value));
    }
    raw.push_str("===OPLOGGER_PANE_HEADER_END===\n");
    let mut bytes = raw.into_bytes();
    bytes.extend_from_slice(body);

    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}
