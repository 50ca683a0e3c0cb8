//! Markdown report rendering.
//!
//! Two documents are written next to the raw logs:
//! - `session_log.md` - full transcript with summary and folded outputs
//! - `commands_only.md` - every command, grouped by pane
//!
//! Rendering is deterministic: the same panes always produce the same bytes.

mod digest;
mod markdown;
mod output;
mod transcript;

pub use output::{fold, language_hint, truncate_command, FoldedOutput};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ReportConfig;
use crate::parser::ParsedPane;

/// File name of the full transcript.
pub const REPORT_FILE: &str = "session_log.md";

/// File name of the commands digest.
pub const COMMANDS_FILE: &str = "commands_only.md";

/// Paths of the written documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReports {
    pub report: PathBuf,
    pub commands: PathBuf,
}

/// Full transcript for `panes`.
pub fn render_transcript(panes: &[ParsedPane], config: &ReportConfig) -> String {
    transcript::render(panes, config)
}

/// Commands-only digest for `panes`.
pub fn render_commands(panes: &[ParsedPane]) -> String {
    digest::render(panes)
}

/// Write both documents, overwriting earlier ones.
///
/// The transcript goes to `output` when given, otherwise into `dir`; the
/// digest always goes into `dir`.
pub fn write_reports(
    dir: &Path,
    panes: &[ParsedPane],
    config: &ReportConfig,
    output: Option<&Path>,
) -> Result<WrittenReports> {
    let report = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(REPORT_FILE));
    let commands = dir.join(COMMANDS_FILE);

    if let Some(parent) = report.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&report, render_transcript(panes, config))
        .with_context(|| format!("Failed to write {}", report.display()))?;
    fs::write(&commands, render_commands(panes))
        .with_context(|| format!("Failed to write {}", commands.display()))?;

    tracing::debug!("wrote {:?} and {:?}", report, commands);
    Ok(WrittenReports { report, commands })
}
