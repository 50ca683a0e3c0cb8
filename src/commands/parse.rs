//! Parse command handler

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};

use oplogger::{ui, Config, LogParser, ReportOutcome};

/// Re-generate reports for `dir` (default: `./<logs_dir>`).
#[cfg(not(tarpaulin_include))]
pub fn handle(dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<ExitCode> {
    let config = Config::load()?;
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&config.capture.logs_dir),
    };

    if !dir.is_dir() {
        ui::error(&format!("Not found: {}", ui::hl(&dir.display().to_string())));
        return Ok(ExitCode::FAILURE);
    }

    generate(&dir, &config, output)
}

/// Parse `dir` and write both reports, reporting the outcome.
pub fn generate(dir: &Path, config: &Config, output: Option<PathBuf>) -> Result<ExitCode> {
    let tools = Config::load_tools()?;
    let outcome = LogParser::new(dir)
        .with_output(output)
        .with_report_config(config.report.clone())
        .run(&tools)?;

    match outcome {
        ReportOutcome::NoLogs => {
            ui::warn("No log files found.");
            Ok(ExitCode::SUCCESS)
        }
        ReportOutcome::NothingParsed { skipped } => {
            for e in &skipped {
                ui::warn(&e.to_string());
            }
            ui::error("No logs could be parsed.");
            Ok(ExitCode::FAILURE)
        }
        ReportOutcome::Written {
            report,
            commands,
            skipped,
            ..
        } => {
            for e in &skipped {
                ui::warn(&e.to_string());
            }
            ui::info(&format!("Report   → {}", ui::hl(&report.display().to_string())));
            ui::info(&format!("Commands → {}", ui::hl(&commands.display().to_string())));
            Ok(ExitCode::SUCCESS)
        }
    }
}
