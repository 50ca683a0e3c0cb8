//! Cursor-column line rendering.
//!
//! Shell line editors redraw the prompt after every keystroke with `\r` and
//! rewrite, and erase with `\b` + space + `\b`. Concatenating the raw text
//! yields duplicated characters (`ooplogger`); simulating the cursor column
//! instead yields what was actually on screen.

/// Stateful renderer turning stripped text into finished lines.
///
/// Rules per character:
/// - `\n` emits the current line (trailing whitespace trimmed) and resets
/// - `\r` moves the cursor to column 0 without clearing
/// - `\b` moves the cursor left, floored at column 0
/// - other C0 controls (except tab) and DEL are dropped
/// - anything else is written at the cursor, padding with spaces if needed
#[derive(Debug, Default, Clone)]
pub struct LineRenderer {
    line: Vec<char>,
    col: usize,
}

impl LineRenderer {
    /// Create an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed stripped text; returns the lines completed by this call.
    pub fn feed(&mut self, text: &str) -> Vec<String> {
        let mut finished = Vec::new();
        for ch in text.chars() {
            if let Some(line) = self.push(ch) {
                finished.push(line);
            }
        }
        finished
    }

    /// Emit the in-progress line, if it has visible content, and reset.
    pub fn flush(&mut self) -> Option<String> {
        let rendered = self.take_line();
        if rendered.is_empty() {
            None
        } else {
            Some(rendered)
        }
    }

    /// Render a complete text in one go: feed, then flush.
    pub fn render_all(text: &str) -> Vec<String> {
        let mut renderer = Self::new();
        let mut lines = renderer.feed(text);
        lines.extend(renderer.flush());
        lines
    }

    /// Current cursor column.
    pub fn column(&self) -> usize {
        self.col
    }

    fn push(&mut self, ch: char) -> Option<String> {
        match ch {
            '\n' => return Some(self.take_line()),
            '\r' => self.col = 0,
            '\u{8}' => self.col = self.col.saturating_sub(1),
            '\t' => self.put(ch),
            c if c.is_ascii_control() => {}
            c => self.put(c),
        }
        None
    }

    fn put(&mut self, ch: char) {
        if self.col < self.line.len() {
            self.line[self.col] = ch;
        } else {
            self.line.resize(self.col, ' ');
            self.line.push(ch);
        }
        self.col += 1;
    }

    fn take_line(&mut self) -> String {
        let rendered: String = self.line.drain(..).collect();
        self.col = 0;
        rendered.trim_end().to_string()
    }
}
