//! Small Markdown helpers shared by both documents.

use std::collections::HashMap;

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Inline code span, widening the delimiter past any backtick run in `text`.
pub fn inline_code(text: &str) -> String {
    match longest_backtick_run(text) {
        0 => format!("`{}`", text),
        run => {
            let delim = "`".repeat(run + 1);
            format!("{delim} {text} {delim}")
        }
    }
}

/// Code fence long enough not to be closed by anything inside `body`.
pub fn fence(body: &str) -> String {
    "`".repeat(longest_backtick_run(body).max(2) + 1)
}

/// Fenced code block with an optional language tag, no trailing newline.
pub fn code_block(lang: &str, body: &str) -> String {
    let fence = fence(body);
    format!("{fence}{lang}\n{body}\n{fence}")
}

/// Heading anchors as GitHub generates them.
///
/// Lowercase, punctuation dropped, each space turned into `-`. Repeated
/// headings get `-1`, `-2`, ... suffixes in document order.
#[derive(Debug, Default)]
pub struct Anchors {
    seen: HashMap<String, usize>,
}

impl Anchors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor for the next heading with this text.
    pub fn next(&mut self, heading: &str) -> String {
        let base = slug(heading);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let anchor = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        anchor
    }
}

fn slug(heading: &str) -> String {
    heading
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}
