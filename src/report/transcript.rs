//! Full session transcript.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::config::ReportConfig;
use crate::parser::{Block, ParsedPane};

use super::markdown::{code_block, inline_code, Anchors};
use super::output::{fold, language_hint, truncate_command};

const TOOL_MARKER: &str = "🔴";
const COMMAND_MARKER: &str = "▸";

/// Headings above the per-pane sections, in document order.
const FIXED_HEADINGS: [&str; 3] = ["Session Log", "Table of Contents", "Summary"];

/// Render the transcript for `panes`, in the order given.
pub fn render(panes: &[ParsedPane], config: &ReportConfig) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut w = |line: String| out.push(line);

    w("# Session Log\n".to_string());
    w(format!(
        "> Generated by **oplogger** from {} log file(s)\n",
        panes.len()
    ));

    let mut anchors = Anchors::new();
    for heading in FIXED_HEADINGS {
        anchors.next(heading);
    }

    w("## Table of Contents\n".to_string());
    for pane in panes {
        let label = pane.label();
        w(format!(
            "- [{}](#{}) — {} commands",
            label,
            anchors.next(&label),
            pane.command_count()
        ));
    }
    w(String::new());

    let total: usize = panes.iter().map(ParsedPane::command_count).sum();
    let tool_runs: usize = panes.iter().map(ParsedPane::tool_count).sum();
    let unique: BTreeSet<&str> = panes
        .iter()
        .flat_map(ParsedPane::commands)
        .filter(|b| b.is_tool)
        .filter_map(Block::base)
        .collect();

    w("## Summary\n".to_string());
    w("| Metric | Value |".to_string());
    w("|--------|-------|".to_string());
    w(format!("| Panes / Sessions | {} |", panes.len()));
    w(format!("| Total Commands | {} |", total));
    w(format!("| Tool Invocations | {} |", tool_runs));
    if !unique.is_empty() {
        let names: Vec<String> = unique.iter().map(|t| inline_code(t)).collect();
        w(format!("| Tools | {} |", names.join(" · ")));
    }
    w(String::new());
    w("---\n".to_string());

    for pane in panes {
        w(format!("## {}\n", pane.label()));
        if let Some(started) = pane.metadata.started() {
            w(format!("> **Started:** {}  ", started));
        }
        if let Some(cwd) = pane.metadata.cwd() {
            w(format!("> **CWD:** {}  ", inline_code(cwd)));
        }
        if let Some(id) = pane.metadata.pane_id() {
            w(format!("> **Pane:** {}  ", inline_code(id)));
        }
        w(String::new());

        if pane.blocks.is_empty() {
            w("_No commands recorded._\n".to_string());
            continue;
        }

        for block in &pane.blocks {
            render_block(block, config, &mut w);
        }
        w("---\n".to_string());
    }

    out.join("\n")
}

fn render_block(block: &Block, config: &ReportConfig, w: &mut impl FnMut(String)) {
    let Some(command) = block.command.as_deref() else {
        if block.has_output() {
            w(format!("{}\n", code_block("", &block.output)));
        }
        return;
    };

    let marker = if block.is_tool {
        TOOL_MARKER
    } else {
        COMMAND_MARKER
    };
    let short = truncate_command(command, config.max_command_width);
    w(format!("### {} {}\n", marker, inline_code(&short)));
    if matches!(short, Cow::Owned(_)) {
        w(format!("{}\n", code_block("bash", command)));
    }

    if !block.has_output() {
        w("_No output._\n".to_string());
        return;
    }

    let folded = fold(&block.output, config);
    let hint = language_hint(block.base().unwrap_or(""), &block.output);
    w("<details>".to_string());
    w(format!("<summary>Output ({} lines)</summary>\n", folded.lines));
    w(format!("{}\n", code_block(hint, &folded.body)));
    w("</details>\n".to_string());
}
