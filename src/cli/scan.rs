//! Scan command: finds repositories and reports AI co-author trailers.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use crate::cli::formatting::render_report;
use crate::config::Settings;
use crate::data::report::{OutputFormat, ScanReport};
use crate::scan::{
    default_concurrency, AnalysisCoordinator, GitCli, PatternSet, RepositoryAnalyzer,
    RepositoryLocator, VersionControl,
};
use crate::utils::prompt::{expand_tilde, prompt_for_directory};

/// Scan command options.
#[derive(Parser)]
pub struct ScanCommand {
    /// Directory to scan (defaults to the saved development directory).
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Maximum number of repositories analyzed at once (default: CPU count).
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Additional co-author pattern (case-insensitive regex). Repeatable.
    #[arg(long = "pattern", value_name = "REGEX")]
    pub patterns: Vec<String>,

    /// Does not save a prompted directory to the settings file.
    #[arg(long)]
    pub no_save: bool,

    /// Exits with error code 1 if any repository is contaminated.
    #[arg(long)]
    pub strict: bool,

    /// Path to git executable.
    #[arg(long, default_value = "git", hide = true)]
    pub git: String,
}

/// Where prompts and progress messages are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusStream {
    Stdout,
    Stderr,
}

impl StatusStream {
    /// Machine-readable reports own stdout, so messages move to stderr.
    fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Stdout,
            OutputFormat::Json | OutputFormat::Yaml => Self::Stderr,
        }
    }

    fn writer(self) -> Box<dyn Write> {
        match self {
            Self::Stdout => Box::new(io::stdout()),
            Self::Stderr => Box::new(io::stderr()),
        }
    }
}

impl ScanCommand {
    /// Executes the scan command.
    pub async fn execute(self) -> Result<()> {
        let output_format: OutputFormat = self
            .format
            .parse()
            .map_err(|()| anyhow::anyhow!("Unknown output format '{}'", self.format))?;
        let text = output_format == OutputFormat::Text;
        let mut status = StatusStream::for_format(output_format).writer();

        let settings_path = Settings::get_settings_path()
            .map_err(|e| warn!("Settings unavailable: {e:#}"))
            .ok();
        let root = {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            self.resolve_root(
                &mut input,
                &mut status,
                settings_path.as_deref(),
                Settings::env_dev_directory(),
            )?
        };
        let Some(root) = root else {
            return Ok(());
        };

        let patterns = self.build_patterns()?;
        let vcs: Arc<dyn VersionControl> = Arc::new(GitCli::with_program(self.git.clone()));

        if text {
            writeln!(status, "Searching for Git repositories in: {}", root.display())?;
        }
        let locator = RepositoryLocator::new(vcs.clone());
        let walk_root = root.clone();
        let repos = tokio::task::spawn_blocking(move || locator.locate(&walk_root))
            .await
            .context("Repository discovery did not complete")?
            .with_context(|| format!("Error finding Git repositories in {}", root.display()))?;

        if repos.is_empty() {
            if text {
                writeln!(status, "No Git repositories found in the specified directory.")?;
            } else {
                let empty = ScanReport::new(Vec::new());
                println!("{}", render_report(&empty, output_format)?);
            }
            return Ok(());
        }

        let concurrency = self.jobs.unwrap_or_else(default_concurrency);
        if text {
            writeln!(status, "Found {} Git repositories. Analyzing...", repos.len())?;
        }

        let analyzer = Arc::new(RepositoryAnalyzer::new(vcs, patterns));
        let results = AnalysisCoordinator::with_concurrency(analyzer, concurrency)
            .analyze_all(repos)
            .await;

        let report = ScanReport::new(results);
        println!("{}", render_report(&report, output_format)?);

        let exit_code = report.exit_code(self.strict);
        if exit_code != 0 {
            std::process::exit(exit_code);
        }

        Ok(())
    }

    /// Builds the builtin pattern set plus any `--pattern` additions.
    fn build_patterns(&self) -> Result<Arc<PatternSet>> {
        let builtin = PatternSet::builtin();
        if self.patterns.is_empty() {
            return Ok(builtin);
        }

        let extra = self
            .patterns
            .iter()
            .enumerate()
            .map(|(i, expr)| (format!("custom-{}", i + 1), expr.as_str()));

        let set = builtin
            .with_additional(extra)
            .context("Invalid --pattern expression")?;
        Ok(Arc::new(set))
    }

    /// Determines the directory to scan.
    ///
    /// Priority: explicit argument, then `env_dir`, then the settings file at
    /// `settings_path`, then a prompt on `input`. A directory that does not
    /// exist is prompted for once more. Returns `None` when the user declines
    /// to provide one. Messages go to `out`.
    fn resolve_root<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
        settings_path: Option<&Path>,
        env_dir: Option<PathBuf>,
    ) -> Result<Option<PathBuf>> {
        if let Some(dir) = &self.directory {
            let dir = expand_tilde(dir, dirs::home_dir().as_deref());
            if !dir.is_dir() {
                bail!("Directory {} does not exist", dir.display());
            }
            return Ok(Some(dir));
        }

        let saved = match settings_path.map(Settings::load_from_path).transpose() {
            Ok(settings) => settings.and_then(|s| s.dev_directory),
            Err(e) => {
                warn!("Error loading settings: {e:#}");
                None
            }
        };

        let mut prompted = false;
        let mut dir = match env_dir.or(saved) {
            Some(dir) => dir,
            None => {
                prompted = true;
                match prompt_for_directory(input, out)? {
                    Some(dir) => dir,
                    None => return decline(out),
                }
            }
        };

        if !dir.is_dir() {
            writeln!(
                out,
                "Directory {} does not exist. Please provide a valid directory.",
                dir.display()
            )?;
            prompted = true;
            dir = match prompt_for_directory(input, out)? {
                Some(dir) => dir,
                None => return decline(out),
            };
        }

        if prompted && !self.no_save {
            if let Some(path) = settings_path {
                let settings = Settings {
                    dev_directory: Some(dir.clone()),
                };
                match settings.save_to_path(path) {
                    Ok(()) => writeln!(out, "Development directory saved to: {}", path.display())?,
                    Err(e) => warn!("Error saving settings: {e:#}"),
                }
            }
        }

        Ok(Some(dir))
    }
}

fn decline<W: Write>(out: &mut W) -> Result<Option<PathBuf>> {
    writeln!(out, "No directory provided. Exiting.")?;
    Ok(None)
}
