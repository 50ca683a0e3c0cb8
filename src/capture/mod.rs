//! Live capture backends.
//!
//! - [`PlainCapture`] runs the shell under a PTY owned by oplogger
//! - [`TmuxCapture`] asks tmux to pipe every pane into a log file
//!
//! Both write one raw log per shell/pane into the log directory, each
//! starting with a [`crate::files::PaneMetadata`] header.

mod error;
pub mod hook;
pub mod pid;
mod pty;
pub mod tmux;
pub mod tty;

pub use error::CaptureError;
pub use pid::{hang_up, read_pid, Hangup, PidMarker, PID_FILE};
pub use pty::{CaptureSummary, PlainCapture};
pub use tmux::{in_tmux, PaneInfo, SystemTmux, Tmux, TmuxCapture, TmuxStarted};
