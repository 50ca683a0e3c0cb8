//! Session parser: raw log files to command blocks.
//!
//! Each `.log` file in a directory is parsed on its own (in parallel), then
//! the panes are handed to the report renderer in file-name order:
//!
//! 1. split the header ([`crate::files::PaneMetadata`])
//! 2. strip escapes and render lines ([`crate::terminal::RenderPipeline`])
//! 3. segment into [`Block`]s on prompt lines
//!
//! A file that fails to parse is skipped; the rest still make it into the
//! report.

mod block;
mod error;
mod pane;
pub mod prompt;

pub use block::{segment, Block};
pub use error::ParseError;
pub use pane::ParsedPane;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::config::{ReportConfig, ToolAllowlist};
use crate::files::filename;
use crate::report;

/// Result of a report run.
#[derive(Debug)]
pub enum ReportOutcome {
    /// Both documents were written.
    Written {
        report: PathBuf,
        commands: PathBuf,
        panes: usize,
        skipped: Vec<ParseError>,
    },
    /// The directory holds no `.log` files.
    NoLogs,
    /// Every log file failed to parse.
    NothingParsed { skipped: Vec<ParseError> },
}

/// Panes parsed from one directory, plus the files that failed.
#[derive(Debug, Default)]
pub struct ParsedLogs {
    pub panes: Vec<ParsedPane>,
    pub skipped: Vec<ParseError>,
}

/// Parses a log directory and writes its reports.
#[derive(Debug, Clone)]
pub struct LogParser {
    dir: PathBuf,
    output: Option<PathBuf>,
    report: ReportConfig,
}

impl LogParser {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            output: None,
            report: ReportConfig::default(),
        }
    }

    /// Write the full transcript here instead of `<dir>/session_log.md`.
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_report_config(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Parse every log file in the directory.
    ///
    /// Panes come back in lexicographic file-name order regardless of
    /// which worker finished first.
    pub fn parse_all(&self, tools: &ToolAllowlist) -> Result<ParsedLogs> {
        if !self.dir.is_dir() {
            bail!("Log directory not found: {}", self.dir.display());
        }
        let files = filename::list_logs(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?;
        tracing::debug!("parsing {} log file(s) in {:?}", files.len(), self.dir);

        let results: Vec<Result<ParsedPane, ParseError>> = files
            .par_iter()
            .map(|path| ParsedPane::from_file(path, tools))
            .collect();

        let mut parsed = ParsedLogs::default();
        for result in results {
            match result {
                Ok(pane) => parsed.panes.push(pane),
                Err(e) => {
                    tracing::debug!("skipping log file: {}", e);
                    parsed.skipped.push(e);
                }
            }
        }
        Ok(parsed)
    }

    /// Parse the directory and write both Markdown documents.
    pub fn run(&self, tools: &ToolAllowlist) -> Result<ReportOutcome> {
        let ParsedLogs { panes, skipped } = self.parse_all(tools)?;
        if panes.is_empty() {
            return Ok(if skipped.is_empty() {
                ReportOutcome::NoLogs
            } else {
                ReportOutcome::NothingParsed { skipped }
            });
        }

        let written = report::write_reports(&self.dir, &panes, &self.report, self.output.as_deref())?;
        Ok(ReportOutcome::Written {
            report: written.report,
            commands: written.commands,
            panes: panes.len(),
            skipped,
        })
    }
}
