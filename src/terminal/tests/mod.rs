//! Rendering tests.
//!
//! Organized by concern:
//! - overwrite: carriage return and backspace semantics
//! - controls: dropped control characters
//! - pipeline: escapes, UTF-8 and chunk boundaries together

use super::{LineRenderer, RenderPipeline};

fn render_one(text: &str) -> String {
    let lines = LineRenderer::render_all(text);
    assert_eq!(lines.len(), 1, "expected one line, got {:?}", lines);
    lines.into_iter().next().unwrap_or_default()
}

// ============================================================================
// Overwrite
// ============================================================================

#[test]
fn carriage_return_overwrites_instead_of_concatenating() {
    assert_eq!(render_one("$ e\r$ oplogger stop"), "$ oplogger stop");
}

#[test]
fn carriage_return_keeps_longer_tail() {
    // \r is non-destructive: a shorter rewrite leaves the old tail
    assert_eq!(render_one("abcdef\rXY"), "XYcdef");
}

#[test]
fn backspace_erase_retype() {
    assert_eq!(render_one("helloo\x08 \x08p"), "hellop");
}

#[test]
fn backspace_floors_at_column_zero() {
    let mut renderer = LineRenderer::new();
    renderer.feed("\x08\x08\x08x");
    assert_eq!(renderer.column(), 1);
    assert_eq!(renderer.flush().as_deref(), Some("x"));
}

#[test]
fn newline_resets_cursor_and_trims_trailing_whitespace() {
    let mut renderer = LineRenderer::new();
    let lines = renderer.feed("first   \nsecond\n");
    assert_eq!(lines, vec!["first", "second"]);
    assert_eq!(renderer.column(), 0);
    assert!(renderer.flush().is_none());
}

#[test]
fn crlf_line_endings_render_cleanly() {
    assert_eq!(
        LineRenderer::render_all("$ echo hi\r\nhi\r\n"),
        vec!["$ echo hi", "hi"]
    );
}

#[test]
fn blank_lines_are_kept_as_empty_strings() {
    assert_eq!(LineRenderer::render_all("a\n\nb"), vec!["a", "", "b"]);
}

#[test]
fn flush_skips_whitespace_only_line() {
    let mut renderer = LineRenderer::new();
    renderer.feed("   ");
    assert!(renderer.flush().is_none());
}

// ============================================================================
// Controls
// ============================================================================

#[test]
fn bell_and_shift_controls_are_dropped() {
    assert_eq!(render_one("abc\x07def\x0e\x0f\x00"), "abcdef");
}

#[test]
fn plain_text_passes_through() {
    assert_eq!(render_one("normal text"), "normal text");
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn pipeline_strips_and_renders() {
    let lines = RenderPipeline::render_all(b"\x1b[31mhello\x1b[0m\r\n");
    assert_eq!(lines, vec!["hello"]);
}

#[test]
fn pipeline_handles_zsh_style_redraw() {
    let raw = b"\x1b[?2004h\x1b[1muser@kali\x1b[0m:~$ e\r\x1b[K\x1b[1muser@kali\x1b[0m:~$ echo hi\x1b[?2004l\r\r\nhi\r\n";
    let lines = RenderPipeline::render_all(raw);
    assert_eq!(lines, vec!["user@kali:~$ echo hi", "hi"]);
}

#[test]
fn pipeline_joins_escape_split_across_chunks() {
    let mut pipeline = RenderPipeline::new();
    let mut lines = pipeline.feed(b"\x1b[3");
    lines.extend(pipeline.feed(b"2mok\x1b[0m\n"));
    assert_eq!(lines, vec!["ok"]);
}

#[test]
fn pipeline_joins_utf8_split_across_chunks() {
    let arrow = "❯".as_bytes();
    let mut pipeline = RenderPipeline::new();
    let mut lines = pipeline.feed(&arrow[..1]);
    lines.extend(pipeline.feed(&arrow[1..]));
    lines.extend(pipeline.feed(b" ls\n"));
    assert_eq!(lines, vec!["❯ ls"]);
}

#[test]
fn pipeline_replaces_invalid_bytes() {
    let lines = RenderPipeline::render_all(b"ab\xffcd\n");
    assert_eq!(lines, vec!["ab\u{fffd}cd"]);
}

#[test]
fn pipeline_finish_emits_partial_line() {
    let mut pipeline = RenderPipeline::new();
    assert!(pipeline.feed(b"$ exit").is_empty());
    assert_eq!(pipeline.finish(), vec!["$ exit"]);
}
