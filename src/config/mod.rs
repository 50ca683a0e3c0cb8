//! Configuration.
//!
//! Everything lives under one base directory, `$OPLOGGER_DIR` or
//! `~/.oplogger`:
//! - `config.toml` - optional settings ([`Config`])
//! - `oplogger.conf` - tool allowlist ([`ToolAllowlist`])
//! - `session.json` - active session marker (see [`crate::state`])

mod tools;

pub use tools::{default_file_content, ToolAllowlist};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the base directory.
pub const BASE_DIR_ENV: &str = "OPLOGGER_DIR";

const CONFIG_FILE: &str = "config.toml";
const TOOLS_FILE: &str = "oplogger.conf";
const STATE_FILE: &str = "session.json";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub report: ReportConfig,
}

/// Live capture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Log directory name, created under the working directory on `start`.
    pub logs_dir: String,
    /// Shell to run for plain captures (default: `$SHELL`, then `/bin/sh`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    /// Upper bound on I/O loop latency in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            logs_dir: "oplogs".to_string(),
            shell: None,
            poll_interval_ms: 250,
        }
    }
}

impl CaptureConfig {
    /// The shell to launch: config override, `$SHELL`, or `/bin/sh`.
    pub fn resolve_shell(&self) -> String {
        self.shell
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var("SHELL").ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "/bin/sh".to_string())
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Outputs with more lines than this are folded.
    pub fold_threshold: usize,
    /// Lines kept from the start of a folded output.
    pub fold_head: usize,
    /// Lines kept from the end of a folded output.
    pub fold_tail: usize,
    /// Commands longer than this (in characters) are shortened in headings.
    pub max_command_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fold_threshold: 200,
            fold_head: 100,
            fold_tail: 50,
            max_command_width: 120,
        }
    }
}

impl Config {
    /// Base directory holding config, allowlist and session state.
    pub fn base_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(BASE_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".oplogger"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join(CONFIG_FILE))
    }

    pub fn tools_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join(TOOLS_FILE))
    }

    pub fn state_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join(STATE_FILE))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write to the default location, creating the base directory.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Load the tool allowlist from the default location.
    pub fn load_tools() -> Result<ToolAllowlist> {
        Ok(ToolAllowlist::load_or_init(&Self::tools_path()?))
    }
}
