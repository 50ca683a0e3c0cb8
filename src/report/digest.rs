//! Commands-only digest.

use crate::parser::ParsedPane;

use super::markdown::inline_code;

/// One line per command, grouped by pane; tool runs marked with 🔴.
pub fn render(panes: &[ParsedPane]) -> String {
    let mut out = vec!["# Commands\n".to_string()];
    for pane in panes {
        out.push(format!("## {}\n", pane.label()));
        for block in pane.commands() {
            let marker = if block.is_tool { "🔴" } else { "-" };
            let command = block.command_text().unwrap_or_default();
            out.push(format!("{} {}", marker, inline_code(command)));
        }
        out.push(String::new());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolAllowlist;
    use std::path::Path;

    #[test]
    fn lists_commands_with_markers() {
        let pane = ParsedPane::from_bytes(
            Path::new("terminal_20250206_101500.log"),
            b"$ nmap 10.0.0.1\nopen\n$ ls\n",
            &ToolAllowlist::default(),
        )
        .unwrap();

        assert_eq!(
            render(&[pane]),
            "# Commands\n\n## Terminal Session\n\n🔴 `nmap 10.0.0.1`\n- `ls`\n"
        );
    }

    #[test]
    fn stray_output_is_not_listed() {
        let pane = ParsedPane::from_bytes(Path::new("t.log"), b"banner\n", &ToolAllowlist::default())
            .unwrap();
        assert_eq!(render(&[pane]), "# Commands\n\n## T\n\n");
    }
}
