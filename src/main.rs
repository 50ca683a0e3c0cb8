//! oplogger CLI entry point

mod commands;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use oplogger::cli::{Cli, Commands, ConfigCommands};
use oplogger::ui;

/// Environment variable holding the log filter (`tracing` directives).
const LOG_ENV: &str = "OPLOGGER_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ui::colors_enabled())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "oplogger", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Start => commands::start::handle(),
        Commands::Stop => commands::stop::handle(),
        Commands::Status => commands::status::handle(),
        Commands::Parse { dir, output } => commands::parse::handle(dir, output),
        Commands::Config(ConfigCommands::Show) => commands::config::handle_show(),
        Commands::Config(ConfigCommands::Edit) => commands::config::handle_edit(),
        Commands::Config(ConfigCommands::Tools) => commands::config::handle_tools(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
