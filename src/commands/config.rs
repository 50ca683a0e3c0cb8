//! Config subcommands handler

use std::process::ExitCode;

use anyhow::{Context, Result};

use oplogger::{ui, Config};

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<ExitCode> {
    let config = Config::load()?;
    let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    ui::debug(&format!("Config file: {}", Config::config_path()?.display()));
    print!("{}", toml_str);
    Ok(ExitCode::SUCCESS)
}

/// Open the configuration file in the default editor.
///
/// Uses $EDITOR environment variable (defaults to 'vi').
#[cfg(not(tarpaulin_include))]
pub fn handle_edit() -> Result<ExitCode> {
    let config_path = Config::config_path()?;

    // Ensure config exists
    if !config_path.exists() {
        Config::default().save()?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    ui::info(&format!(
        "Opening {} with {}",
        ui::hl(&config_path.display().to_string()),
        editor
    ));

    let status = std::process::Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to open editor: {}", e))?;

    // Surface mistakes made in the editor right away.
    Config::load()?;

    Ok(if status.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print the tool allowlist and where it is stored.
#[cfg(not(tarpaulin_include))]
pub fn handle_tools() -> Result<ExitCode> {
    let path = Config::tools_path()?;
    let tools = Config::load_tools()?;
    ui::info(&format!(
        "{} highlighted tools from {}",
        tools.len(),
        ui::hl(&path.display().to_string())
    ));
    for name in tools.iter() {
        println!("{}", name);
    }
    Ok(ExitCode::SUCCESS)
}
