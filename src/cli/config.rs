//! Configuration-related CLI commands.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::config::{Settings, DEV_DIRECTORY_ENV};
use crate::utils::prompt::expand_tilde;

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Shows the settings file location and the saved development directory.
    Show(ShowCommand),
    /// Saves the development directory to scan by default.
    Set(SetCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {}

/// Set command options.
#[derive(Parser)]
pub struct SetCommand {
    /// Development directory containing your repositories.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
            ConfigSubcommands::Set(set_cmd) => set_cmd.execute(),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let path = Settings::get_settings_path()?;
        let settings = Settings::load_from_path(&path)?;

        println!("Settings file: {}", path.display());
        match &settings.dev_directory {
            Some(dir) => println!("DEV_DIRECTORY={}", dir.display()),
            None => println!("DEV_DIRECTORY is not set"),
        }

        if let Some(dir) = settings.resolved_dev_directory() {
            if settings.dev_directory.as_ref() != Some(&dir) {
                println!("Overridden by {DEV_DIRECTORY_ENV}: {}", dir.display());
            }
        }

        Ok(())
    }
}

impl SetCommand {
    /// Executes the set command.
    pub fn execute(self) -> Result<()> {
        let dir = expand_tilde(&self.directory, dirs::home_dir().as_deref());
        if !dir.is_dir() {
            bail!("Directory {} does not exist", dir.display());
        }

        let settings = Settings {
            dev_directory: Some(dir),
        };
        let path = settings.save()?;
        println!("Development directory saved to: {}", path.display());
        Ok(())
    }
}
