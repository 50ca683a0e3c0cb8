//! Terminal output rendering.
//!
//! Turns raw terminal output into the logical lines a user saw on screen.
//! Shared by the live capture (streaming) and the log parser (bulk).
//!
//! This is not a terminal emulator: there is no screen buffer and no cursor
//! addressing. Only column movement within one line is simulated.
//!
//! - [`escape`] - escape sequence stripping
//! - [`line`] - carriage-return / backspace overwrite simulation
//! - [`stream`] - byte-level pipeline combining both

pub mod escape;
pub mod line;
pub mod stream;

#[cfg(test)]
mod tests;

pub use escape::{strip_escapes, strip_escapes_str, EscapeStripper};
pub use line::LineRenderer;
pub use stream::RenderPipeline;
