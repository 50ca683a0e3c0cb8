//! Capture errors.

use std::io;

/// Conditions that prevent a capture from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("stdin is not a terminal; run oplogger start from an interactive shell")]
    NotATerminal,

    #[error("tmux is not installed or not on PATH")]
    TmuxMissing,

    #[error("Not inside a tmux session")]
    NotInTmux,

    #[error("tmux {command} failed: {message}")]
    TmuxFailed { command: String, message: String },

    #[error("Invalid shell path: {0:?}")]
    InvalidShell(String),

    #[error("Failed to allocate a pseudo-terminal: {0}")]
    Pty(#[source] io::Error),

    #[error("Failed to configure the terminal: {0}")]
    Terminal(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
