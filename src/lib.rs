//! oplogger - terminal session logger
//!
//! Captures a shell (or every pane of a tmux session) and turns the raw
//! byte stream into readable Markdown: a full transcript with folded
//! outputs and a commands-only digest.
//!
//! - [`capture`] - live capture (PTY or tmux `pipe-pane`)
//! - [`terminal`] - escape stripping and carriage-return/backspace rendering
//! - [`parser`] - log files to command blocks
//! - [`report`] - Markdown documents

pub mod capture;
pub mod cli;
pub mod config;
pub mod files;
pub mod parser;
pub mod report;
pub mod state;
pub mod terminal;
pub mod ui;

pub use config::{Config, ToolAllowlist};
pub use parser::{LogParser, ParsedPane, ReportOutcome};
pub use state::{CaptureKind, SessionState, StateStore};
