//! Stop command handler

use std::process::ExitCode;

use anyhow::{Context, Result};

use oplogger::capture::{self, Hangup, TmuxCapture};
use oplogger::{ui, CaptureKind, Config, StateStore};

use super::parse;

/// Stop the active capture and generate its report.
///
/// A plain capture is stopped by hanging up its shell; the `start` process
/// then writes the report. If the shell is already gone the report is
/// written here.
#[cfg(not(tarpaulin_include))]
pub fn handle() -> Result<ExitCode> {
    let config = Config::load()?;
    let store = StateStore::open_default()?;

    let Some(state) = store.load() else {
        if store.is_active() {
            ui::warn("Session state is unreadable; clearing it.");
            store.clear()?;
        }
        ui::error("No active session.");
        return Ok(ExitCode::FAILURE);
    };

    let finish = || -> Result<ExitCode> {
        let code = parse::generate(&state.dir, &config, None)?;
        store.clear()?;
        Ok(code)
    };

    match state.kind {
        CaptureKind::Tmux => {
            let session = state.tmux_session.clone().unwrap_or_default();
            if !session.is_empty() {
                TmuxCapture::new(&state.dir).stop_all(&session);
            }
            ui::info(&format!("Stopped tmux session {}", ui::hl(&session)));
            finish()
        }
        CaptureKind::Plain => match capture::read_pid(&state.dir) {
            Some(pid) => match capture::hang_up(pid).context("Failed to signal the shell")? {
                Hangup::Signalled => {
                    ui::info("Stopping - report will be generated automatically.");
                    Ok(ExitCode::SUCCESS)
                }
                Hangup::AlreadyEnded => {
                    ui::info("Session already ended.");
                    finish()
                }
            },
            None => {
                ui::warn("No PID found - generating report from existing logs.");
                finish()
            }
        },
    }
}
