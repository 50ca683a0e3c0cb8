//! User-facing status output.
//!
//! Short, marked lines on stderr so stdout stays clean for the shell being
//! captured. Colors come from a small [`Theme`] and are dropped when
//! `NO_COLOR` is set or stderr is not a terminal.

use crossterm::style::{Attribute, Color, Stylize};
use unicode_width::UnicodeWidthStr;

/// Colors for status output.
#[derive(Debug, Clone)]
pub struct Theme {
    pub info: Color,
    pub warn: Color,
    pub error: Color,
    pub debug: Color,
    pub highlight: Color,
    pub dim: Color,
    /// When false every helper returns its input unchanged.
    pub enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            info: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            debug: Color::Blue,
            highlight: Color::Cyan,
            dim: Color::DarkGrey,
            enabled: true,
        }
    }
}

impl Theme {
    /// Default theme with colors only where they will render.
    pub fn current() -> Self {
        Self {
            enabled: colors_enabled(),
            ..Self::default()
        }
    }

    /// Default theme without colors.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let styled = text.with(color);
        if bold {
            styled.attribute(Attribute::Bold).to_string()
        } else {
            styled.to_string()
        }
    }

    pub fn highlight(&self, text: &str) -> String {
        self.paint(text, self.highlight, true)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, self.dim, false)
    }

    pub fn info_line(&self, msg: &str) -> String {
        format!(" {} {}", self.paint("✓", self.info, false), msg)
    }

    pub fn warn_line(&self, msg: &str) -> String {
        format!(" {} {}", self.paint("!", self.warn, false), msg)
    }

    pub fn error_line(&self, msg: &str) -> String {
        format!(" {} {}", self.paint("✗", self.error, true), msg)
    }

    pub fn debug_line(&self, msg: &str) -> String {
        format!(" {} {}", self.paint("•", self.debug, false), msg)
    }

    /// Two-column key/value table, keys padded to equal display width.
    pub fn table(&self, rows: &[(&str, String)]) -> String {
        let width = rows.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
        let mut out = String::new();
        for (key, value) in rows {
            let pad = " ".repeat(width - key.width());
            out.push_str(&format!(
                " {}{}  {}\n",
                self.paint(key, Color::Reset, true),
                pad,
                value
            ));
        }
        out
    }
}

/// Whether colored output should be produced on stderr.
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stderr)
}

pub fn info(msg: &str) {
    eprintln!("{}", Theme::current().info_line(msg));
}

pub fn warn(msg: &str) {
    eprintln!("{}", Theme::current().warn_line(msg));
}

pub fn error(msg: &str) {
    eprintln!("{}", Theme::current().error_line(msg));
}

pub fn debug(msg: &str) {
    eprintln!("{}", Theme::current().debug_line(msg));
}

/// Emphasize part of a message.
pub fn hl(text: &str) -> String {
    Theme::current().highlight(text)
}

/// Program name and version, shown when a capture starts.
pub fn banner() {
    let theme = Theme::current();
    eprintln!(
        "\n {} {}\n",
        theme.highlight("oplogger"),
        theme.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
}

pub fn status_table(rows: &[(&str, String)]) {
    eprint!("{}", Theme::current().table(rows));
}
