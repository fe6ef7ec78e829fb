//! Settings persisted between runs.
//!
//! The development directory is stored in `$HOME/.secure-git.env` as a single
//! `DEV_DIRECTORY=<path>` line. The `SECURE_GIT_DEV_DIRECTORY` environment
//! variable overrides the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name of the settings dotfile in the home directory.
pub const SETTINGS_FILE: &str = ".secure-git.env";

/// Key holding the development directory.
pub const DEV_DIRECTORY_KEY: &str = "DEV_DIRECTORY";

/// Environment variable that overrides the stored development directory.
pub const DEV_DIRECTORY_ENV: &str = "SECURE_GIT_DEV_DIRECTORY";

/// Settings loaded from the dotfile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Root directory to scan for repositories.
    pub dev_directory: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    ///
    /// A missing file yields empty settings.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        Ok(Self::parse(&content))
    }

    /// Parses dotfile content. Unknown keys are ignored.
    pub fn parse(content: &str) -> Self {
        let prefix = format!("{DEV_DIRECTORY_KEY}=");

        let dev_directory = content
            .lines()
            .find_map(|line| line.trim().strip_prefix(prefix.as_str()))
            .map(|value| value.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self { dev_directory }
    }

    /// Writes settings to the default location and returns the path written.
    pub fn save(&self) -> Result<PathBuf> {
        let settings_path = Self::get_settings_path()?;
        self.save_to_path(&settings_path)?;
        Ok(settings_path)
    }

    /// Writes settings to a specific path.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = self
            .dev_directory
            .as_ref()
            .context("No development directory to save")?;

        let content = format!("{DEV_DIRECTORY_KEY}={}\n", dir.display());
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(SETTINGS_FILE))
    }

    /// Returns the development directory, preferring the environment.
    pub fn resolved_dev_directory(&self) -> Option<PathBuf> {
        Self::env_dev_directory().or_else(|| self.dev_directory.clone())
    }

    /// Returns the non-empty `SECURE_GIT_DEV_DIRECTORY` value, if set.
    pub fn env_dev_directory() -> Option<PathBuf> {
        env::var_os(DEV_DIRECTORY_ENV)
            .filter(|value| !value.to_string_lossy().trim().is_empty())
            .map(PathBuf::from)
    }
}
