//! tmux capture: every pane of the current session via `pipe-pane`.
//!
//! Existing panes get a log file with a header and a `pipe-pane` that
//! appends their raw output to it. Panes created later are picked up by
//! `after-split-window`/`after-new-window` hooks running a small helper
//! script (see [`super::hook`]). Nothing stays resident in oplogger itself.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{Local, Utc};

use crate::files::{filename, header, PaneMetadata};

use super::error::CaptureError;
use super::hook;

/// Environment variable tmux sets inside its panes.
pub const TMUX_ENV: &str = "TMUX";

/// Hooks that fire when a pane is created.
pub const PANE_HOOKS: [&str; 2] = ["after-split-window", "after-new-window"];

const PANE_FORMAT: &str = "#{pane_id}\t#{window_index}\t#{pane_index}\t#{pane_current_path}";

/// Whether this process runs inside a tmux pane.
pub fn in_tmux() -> bool {
    std::env::var_os(TMUX_ENV).is_some_and(|v| !v.is_empty())
}

/// Runs tmux commands.
///
/// The production implementation shells out to the `tmux` binary; tests
/// substitute a recorder.
pub trait Tmux: Send + Sync {
    /// Run `tmux <args>` and return its stdout.
    fn run(&self, args: &[&str]) -> Result<String, CaptureError>;
}

/// The `tmux` binary on PATH.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTmux;

impl SystemTmux {
    pub fn is_available() -> bool {
        Command::new("tmux").arg("-V").output().is_ok()
    }
}

impl Tmux for SystemTmux {
    fn run(&self, args: &[&str]) -> Result<String, CaptureError> {
        let output = Command::new("tmux").args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CaptureError::TmuxMissing
            } else {
                CaptureError::Io(e)
            }
        })?;
        if !output.status.success() {
            return Err(CaptureError::TmuxFailed {
                command: args.first().copied().unwrap_or_default().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// One pane as listed by `list-panes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneInfo {
    pub id: String,
    pub window: String,
    pub pane: String,
    pub cwd: String,
}

impl PaneInfo {
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.splitn(4, '\t');
        Some(Self {
            id: parts.next()?.to_string(),
            window: parts.next()?.to_string(),
            pane: parts.next()?.to_string(),
            cwd: parts.next()?.to_string(),
        })
    }
}

/// What `start` set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxStarted {
    pub session: String,
    pub logs: Vec<PathBuf>,
    pub helper: PathBuf,
}

/// Attaches and detaches logging for a tmux session.
pub struct TmuxCapture {
    tmux: Box<dyn Tmux>,
    logs_dir: PathBuf,
}

impl TmuxCapture {
    /// Capture using the system tmux.
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self::with_tmux(Box::new(SystemTmux), logs_dir)
    }

    /// Capture using a specific tmux implementation (for testing).
    pub fn with_tmux(tmux: Box<dyn Tmux>, logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            tmux,
            logs_dir: logs_dir.into(),
        }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Name of the session this process runs in.
    pub fn current_session(&self) -> Result<String, CaptureError> {
        let name = self.tmux.run(&["display-message", "-p", "#S"])?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CaptureError::NotInTmux);
        }
        Ok(name.to_string())
    }

    /// Every pane in every window of `session`.
    pub fn list_panes(&self, session: &str) -> Result<Vec<PaneInfo>, CaptureError> {
        let out = self
            .tmux
            .run(&["list-panes", "-s", "-t", session, "-F", PANE_FORMAT])?;
        Ok(out.lines().filter_map(PaneInfo::parse).collect())
    }

    /// Start logging every pane of the current session and hook new ones.
    pub fn start(&self) -> Result<TmuxStarted, CaptureError> {
        let session = self.current_session()?;
        std::fs::create_dir_all(&self.logs_dir)?;

        let mut logs = Vec::new();
        for pane in self.list_panes(&session)? {
            logs.push(self.attach(&pane)?);
        }

        let helper = hook::install(&self.logs_dir)?;
        let command = format!("run-shell {}", hook::shell_quote(&helper.to_string_lossy()));
        for event in PANE_HOOKS {
            self.tmux.run(&["set-hook", "-t", &session, event, &command])?;
        }

        tracing::debug!("tmux session {:?}: {} pane(s) attached", session, logs.len());
        Ok(TmuxStarted {
            session,
            logs,
            helper,
        })
    }

    fn attach(&self, pane: &PaneInfo) -> Result<PathBuf, CaptureError> {
        let path = self
            .logs_dir
            .join(filename::pane(&pane.window, &pane.pane, &Local::now()));
        PaneMetadata::new()
            .with(header::KEY_TYPE, "tmux")
            .with(header::KEY_PANE_ID, pane.id.as_str())
            .with(header::KEY_WINDOW, pane.window.as_str())
            .with(header::KEY_PANE, pane.pane.as_str())
            .with(header::KEY_STARTED, Utc::now().to_rfc3339())
            .with(header::KEY_CWD, pane.cwd.as_str())
            .write_to(&path)?;

        let pipe = format!("cat >> {}", hook::shell_quote(&path.to_string_lossy()));
        self.tmux.run(&["pipe-pane", "-t", &pane.id, "-o", &pipe])?;
        Ok(path)
    }

    /// Stop logging in `session` and remove the hooks and helper.
    ///
    /// Best effort and idempotent: failures (tmux gone, session closed,
    /// nothing attached) are logged and skipped.
    pub fn stop_all(&self, session: &str) {
        let panes = match self.list_panes(session) {
            Ok(panes) => panes,
            Err(e) => {
                tracing::warn!("could not list panes of {:?}: {}", session, e);
                Vec::new()
            }
        };
        for pane in &panes {
            if let Err(e) = self.tmux.run(&["pipe-pane", "-t", &pane.id]) {
                tracing::debug!("pipe-pane stop for {}: {}", pane.id, e);
            }
        }
        for event in PANE_HOOKS {
            if let Err(e) = self.tmux.run(&["set-hook", "-u", "-t", session, event]) {
                tracing::debug!("unset {}: {}", event, e);
            }
        }
        if let Err(e) = hook::remove(&self.logs_dir) {
            tracing::warn!("could not remove hook helper: {}", e);
        }
    }
}
