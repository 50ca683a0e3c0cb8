//! Build tasks for oplogger.
//!
//! Usage: `cargo xtask gen-man [--out-dir DIR]`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "oplogger build tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for oplogger and its subcommands
    GenMan {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    match Xtask::parse().task {
        Task::GenMan { out_dir } => gen_man(&out_dir),
    }
}

fn gen_man(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let cmd = oplogger::cli::Cli::command();
    write_page(out_dir, "oplogger", cmd.clone())?;

    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        write_page(out_dir, &format!("oplogger-{}", sub.get_name()), sub.clone())?;
    }

    println!("Man pages written to {}", out_dir.display());
    Ok(())
}

fn write_page(out_dir: &Path, name: &str, cmd: clap::Command) -> Result<()> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .title(name.to_uppercase())
        .render(&mut buf)
        .with_context(|| format!("Failed to render man page for {}", name))?;
    let path = out_dir.join(format!("{}.1", name));
    fs::write(&path, buf).with_context(|| format!("Failed to write {}", path.display()))
}
