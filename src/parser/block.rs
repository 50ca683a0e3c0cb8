//! Segmentation of rendered lines into command blocks.

use crate::config::ToolAllowlist;

use super::prompt::{command_base, match_prompt};

/// One command and the output printed before the next prompt.
///
/// A block without a command holds output seen before the first prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub command: Option<String>,
    pub output: String,
    pub is_tool: bool,
}

impl Block {
    fn command(command: &str, output: Vec<&str>, tools: &ToolAllowlist) -> Self {
        let base = command_base(command);
        Self {
            is_tool: !base.is_empty() && tools.contains(base),
            command: Some(command.to_string()),
            output: join_output(&output),
        }
    }

    fn stray(output: Vec<&str>) -> Self {
        Self {
            command: None,
            output: join_output(&output),
            is_tool: false,
        }
    }

    /// The command, if this block has a non-empty one.
    pub fn command_text(&self) -> Option<&str> {
        self.command.as_deref().filter(|c| !c.is_empty())
    }

    /// Executable basename of the command.
    pub fn base(&self) -> Option<&str> {
        self.command_text().map(command_base)
    }

    pub fn has_output(&self) -> bool {
        !self.output.trim().is_empty()
    }

    /// Number of output lines.
    pub fn line_count(&self) -> usize {
        if self.output.is_empty() {
            0
        } else {
            self.output.split('\n').count()
        }
    }
}

fn join_output(lines: &[&str]) -> String {
    lines.join("\n").trim_end().to_string()
}

/// Split rendered lines into blocks.
///
/// Each prompt line closes the pending block and opens a new one. Output
/// before the first prompt becomes a command-less block when it has any
/// non-blank content.
pub fn segment<S: AsRef<str>>(lines: &[S], tools: &ToolAllowlist) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut command: Option<&str> = None;
    let mut output: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        let Some(m) = match_prompt(line) else {
            output.push(line);
            continue;
        };

        match command.take() {
            Some(cmd) => blocks.push(Block::command(cmd, std::mem::take(&mut output), tools)),
            None if output.iter().any(|l| !l.trim().is_empty()) => {
                blocks.push(Block::stray(std::mem::take(&mut output)))
            }
            None => output.clear(),
        }
        command = Some(m.command);
    }

    match command {
        Some(cmd) => blocks.push(Block::command(cmd, output, tools)),
        None if output.iter().any(|l| !l.trim().is_empty()) => blocks.push(Block::stray(output)),
        None => {}
    }

    blocks
}
