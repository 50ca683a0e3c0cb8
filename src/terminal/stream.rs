//! Raw byte stream to rendered lines.
//!
//! Chains [`EscapeStripper`], an incremental UTF-8 decoder and
//! [`LineRenderer`]. The live capture feeds PTY reads through it as they
//! arrive; the log parser feeds a whole file body at once.

use super::escape::EscapeStripper;
use super::line::LineRenderer;

/// Streaming renderer over raw terminal output bytes.
#[derive(Debug, Default)]
pub struct RenderPipeline {
    stripper: EscapeStripper,
    utf8_tail: Vec<u8>,
    renderer: LineRenderer,
}

impl RenderPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns the lines completed by this chunk.
    pub fn feed(&mut self, raw: &[u8]) -> Vec<String> {
        let stripped = self.stripper.feed(raw);
        let text = self.decode(&stripped);
        self.renderer.feed(&text)
    }

    /// Drain held-back input and return the final partial line, if any.
    pub fn finish(&mut self) -> Vec<String> {
        let rest = self.stripper.finish();
        let mut lines = if rest.is_empty() {
            Vec::new()
        } else {
            let text = self.decode(&rest);
            self.renderer.feed(&text)
        };

        if !self.utf8_tail.is_empty() {
            let tail = std::mem::take(&mut self.utf8_tail);
            lines.extend(self.renderer.feed(&String::from_utf8_lossy(&tail)));
        }
        lines.extend(self.renderer.flush());
        lines
    }

    /// Render a complete buffer in bulk.
    pub fn render_all(raw: &[u8]) -> Vec<String> {
        let mut pipeline = Self::new();
        let mut lines = pipeline.feed(raw);
        lines.extend(pipeline.finish());
        lines
    }

    /// Decode as much as possible, holding back an incomplete trailing
    /// UTF-8 sequence. Invalid bytes become U+FFFD.
    fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.utf8_tail);
        input.extend_from_slice(bytes);

        let mut text = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to guarantees this prefix is well-formed
                    text.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.utf8_tail = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        text
    }
}
