//! Output size policy and highlighting hints.

use std::borrow::Cow;

use crate::config::ReportConfig;

/// Output body as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedOutput<'a> {
    pub body: Cow<'a, str>,
    /// Lines in the original output.
    pub lines: usize,
    /// Lines replaced by the omission marker; zero when not folded.
    pub omitted: usize,
}

/// Keep the head and tail of outputs longer than the fold threshold.
pub fn fold<'a>(output: &'a str, config: &ReportConfig) -> FoldedOutput<'a> {
    let lines: Vec<&str> = output.split('\n').collect();
    let total = lines.len();
    let kept = config.fold_head + config.fold_tail;

    if total <= config.fold_threshold || kept >= total {
        return FoldedOutput {
            body: Cow::Borrowed(output),
            lines: total,
            omitted: 0,
        };
    }

    let omitted = total - kept;
    let head = lines[..config.fold_head].join("\n");
    let tail = lines[total - config.fold_tail..].join("\n");
    FoldedOutput {
        body: Cow::Owned(format!(
            "{}\n\n... [{} lines omitted] ...\n\n{}",
            head, omitted, tail
        )),
        lines: total,
        omitted,
    }
}

/// Shorten a command to `width` characters, ending in `...` when cut.
pub fn truncate_command(command: &str, width: usize) -> Cow<'_, str> {
    if command.chars().count() <= width {
        return Cow::Borrowed(command);
    }
    let keep = width.saturating_sub(3);
    let mut short: String = command.chars().take(keep).collect();
    short.push_str("...");
    Cow::Owned(short)
}

/// Fence language for an output block; empty when nothing fits.
pub fn language_hint(base: &str, output: &str) -> &'static str {
    let trimmed = output.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return "json";
    }
    if trimmed.starts_with('<') {
        return "xml";
    }
    match base {
        "curl" => "http",
        "python" | "python3" => "python",
        "jq" => "json",
        _ => "",
    }
}
