//! Start command handler

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

use oplogger::capture::{self, PlainCapture, TmuxCapture};
use oplogger::{ui, CaptureKind, Config, SessionState, StateStore};

use super::parse;

/// Start a capture: every tmux pane when inside tmux, this shell otherwise.
#[cfg(not(tarpaulin_include))]
pub fn handle() -> Result<ExitCode> {
    let config = Config::load()?;
    let store = StateStore::open_default()?;

    if store.is_active() {
        let dir = store
            .load()
            .map(|s| s.dir.display().to_string())
            .unwrap_or_else(|| "?".to_string());
        ui::error(&format!("Already logging in {}", ui::hl(&dir)));
        ui::error("Run oplogger stop first.");
        return Ok(ExitCode::FAILURE);
    }

    ui::banner();

    let logs_dir = std::env::current_dir()
        .context("Failed to get current directory")?
        .join(&config.capture.logs_dir);

    if capture::in_tmux() {
        start_tmux(&store, logs_dir)
    } else {
        start_plain(&store, &config, logs_dir)
    }
}

#[cfg(not(tarpaulin_include))]
fn start_tmux(store: &StateStore, logs_dir: PathBuf) -> Result<ExitCode> {
    ui::debug("tmux detected - logging all panes");
    let tmux = TmuxCapture::new(&logs_dir);

    let started = match tmux.start() {
        Ok(started) => started,
        Err(e) => {
            // Undo whatever was attached before the failure.
            if let Ok(session) = tmux.current_session() {
                tmux.stop_all(&session);
            }
            return Err(e).context("Failed to start tmux capture");
        }
    };

    store.save(&SessionState::new(logs_dir, CaptureKind::Tmux).with_tmux_session(&started.session))?;

    ui::info(&format!(
        "Logging {} pane(s) - new panes auto-logged",
        ui::hl(&started.logs.len().to_string())
    ));
    ui::info("Run oplogger stop when done.");
    Ok(ExitCode::SUCCESS)
}

#[cfg(not(tarpaulin_include))]
fn start_plain(store: &StateStore, config: &Config, logs_dir: PathBuf) -> Result<ExitCode> {
    ui::debug("Plain terminal - logging this shell");
    let plain = PlainCapture::new(&logs_dir, &config.capture);

    store.save(&SessionState::new(logs_dir.clone(), CaptureKind::Plain))?;
    ui::info(&format!(
        "Logging {} to {}",
        plain.shell(),
        ui::hl(&logs_dir.display().to_string())
    ));
    ui::info("Type exit or run oplogger stop to finish.\n");

    // Blocks until the shell exits or `oplogger stop` hangs it up.
    let summary = match plain.run() {
        Ok(summary) => summary,
        Err(e) => {
            store.clear()?;
            return Err(e).context("Capture failed");
        }
    };
    tracing::debug!(
        "shell exited with {} ({:?})",
        summary.exit_code,
        summary.log_path
    );

    if store.is_active() {
        let code = parse::generate(&logs_dir, config, None)?;
        store.clear()?;
        return Ok(code);
    }
    Ok(ExitCode::SUCCESS)
}
