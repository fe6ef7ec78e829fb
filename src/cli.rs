//! CLI interface for secure-git.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod config;
pub mod formatting;
pub mod scan;

/// secure-git: detects AI-assistant co-authors in your Git repositories.
#[derive(Parser)]
#[command(name = "secure-git")]
#[command(
    about = "Detects AI-assistant co-author trailers in every Git repository under a directory",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The command to execute (defaults to `scan`).
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Main commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scans a directory tree for repositories with suspicious co-authors.
    Scan(scan::ScanCommand),
    /// Settings management.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Some(Commands::Scan(scan_cmd)) => scan_cmd.execute().await,
            Some(Commands::Config(config_cmd)) => config_cmd.execute(),
            None => scan::ScanCommand::parse_from(["scan"]).execute().await,
        }
    }
}
