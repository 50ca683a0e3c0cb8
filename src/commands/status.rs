//! Status command handler

use std::fs;
use std::process::ExitCode;

use anyhow::Result;

use oplogger::capture;
use oplogger::files::filename;
use oplogger::{ui, StateStore};

/// Print the active session, if any.
#[cfg(not(tarpaulin_include))]
pub fn handle() -> Result<ExitCode> {
    let store = StateStore::open_default()?;
    let Some(state) = store.load() else {
        ui::info("No active session.");
        return Ok(ExitCode::SUCCESS);
    };

    let logs = filename::list_logs(&state.dir).unwrap_or_default();
    let total: u64 = logs
        .iter()
        .filter_map(|path| fs::metadata(path).ok())
        .map(|meta| meta.len())
        .sum();

    let mut rows = vec![
        ("Directory", state.dir.display().to_string()),
        ("Type", state.kind.to_string()),
        ("Started", state.started.clone()),
    ];
    if let Some(session) = state.tmux_session.as_deref().filter(|s| !s.is_empty()) {
        rows.push(("tmux session", session.to_string()));
    }
    if let Some(pid) = capture::read_pid(&state.dir) {
        rows.push(("Shell PID", pid.to_string()));
    }
    rows.push((
        "Log files",
        format!(
            "{}  ({})",
            logs.len(),
            humansize::format_size(total, humansize::BINARY)
        ),
    ));

    ui::status_table(&rows);
    Ok(ExitCode::SUCCESS)
}
