//! Active session marker.
//!
//! While a capture runs, a small JSON file records where its logs go and how
//! to stop it. Its presence is what "a session is active" means.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How a session is being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureKind {
    /// One shell inside a PTY owned by `oplogger start`.
    Plain,
    /// Every pane of a tmux session via `pipe-pane`.
    Tmux,
}

impl CaptureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Tmux => "tmux",
        }
    }
}

impl std::fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of the session marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Log directory of the running capture.
    pub dir: PathBuf,
    #[serde(rename = "type")]
    pub kind: CaptureKind,
    /// RFC 3339 UTC start time.
    pub started: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmux_session: Option<String>,
    /// Keys written by other versions, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SessionState {
    /// A new session starting now.
    pub fn new(dir: PathBuf, kind: CaptureKind) -> Self {
        Self {
            dir,
            kind,
            started: chrono::Utc::now().to_rfc3339(),
            tmux_session: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_tmux_session(mut self, session: impl Into<String>) -> Self {
        self.tmux_session = Some(session.into());
        self
    }
}

/// Reads and writes the session marker file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured base directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::Config::state_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.path.is_file()
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut json = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
        json.push('\n');
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Current state, or `None` if missing or unreadable.
    pub fn load(&self) -> Option<SessionState> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!("ignoring corrupt session state {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Remove the marker; a missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
