//! Shell prompt recognition.
//!
//! A rendered line that starts with a recognizable prompt opens a new
//! command block; the rest of the line is the command. Rules are tried in
//! order and the first match wins.
//!
//! The catch-all rule (anything up to a `$`/`#` followed by a space and a
//! non-space) also fires on ordinary output such as `cost: 5$ each`.

use std::sync::LazyLock;

use regex::Regex;

/// Prompt rules, in priority order. Each captures the prompt as `prompt`.
static PROMPTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // user@host:~/dir$
        r"^(?P<prompt>[\w.-]+@[\w.-]+:[^$#]*[$#]\s)",
        // [user@host dir]$
        r"^(?P<prompt>\[[\w.-]+@[\w.-]+\s[^\]]*\][$#]\s)",
        // bare $ or #
        r"^(?P<prompt>[$#]\s)",
        // (venv) user@host:~$
        r"^(?P<prompt>\([\w.-]+\)\s*[\w.-]+@[\w.-]+:[^$#]*[$#]\s)",
        // catch-all: ...$ cmd
        r"^(?P<prompt>.*[$#]\s)\S",
        // kali two-line prompt, second line
        r"^(?P<prompt>└─[$#]\s)",
        // starship / pure
        r"^(?P<prompt>❯\s)",
        // oh-my-zsh robbyrussell
        r"^(?P<prompt>➜\s+)\S",
        // python REPL
        r"^(?P<prompt>>>>\s)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("prompt pattern must compile"))
    .collect()
});

/// A line split into its prompt and the command typed after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptMatch<'a> {
    pub prompt: &'a str,
    pub command: &'a str,
}

/// Match `line` against the prompt rules.
pub fn match_prompt(line: &str) -> Option<PromptMatch<'_>> {
    PROMPTS.iter().find_map(|re| {
        let prompt = re.captures(line)?.name("prompt")?;
        Some(PromptMatch {
            prompt: prompt.as_str(),
            command: line[prompt.end()..].trim(),
        })
    })
}

pub fn is_prompt(line: &str) -> bool {
    match_prompt(line).is_some()
}

/// Command typed after the prompt; the trimmed line if there is no prompt.
pub fn extract_command(line: &str) -> &str {
    match match_prompt(line) {
        Some(m) => m.command,
        None => line.trim(),
    }
}

/// Executable basename of a command line.
///
/// Takes the first word, skips a leading `sudo`, and drops any path prefix:
/// `sudo /usr/bin/nmap -sS host` gives `nmap`.
pub fn command_base(command: &str) -> &str {
    let mut words = command.split_whitespace();
    let Some(first) = words.next() else {
        return "";
    };
    let token = if first == "sudo" {
        words.next().unwrap_or(first)
    } else {
        first
    };
    token.rsplit('/').next().unwrap_or(token)
}
