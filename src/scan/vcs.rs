//! The version-control oracle.
//!
//! Repositories are only ever inspected through the four operations on
//! [`VersionControl`]. The production implementation shells out to the `git`
//! command-line tool; tests substitute an in-memory fake.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::scan::error::AnalysisError;

/// Read-only queries against a version-control repository.
pub trait VersionControl: Send + Sync {
    /// Returns `true` if `dir` is a well-formed, readable repository.
    fn is_valid_repository(&self, dir: &Path) -> bool;

    /// Returns the raw output of a commit count query for HEAD.
    ///
    /// Fails when HEAD is unborn or invalid. Parsing is left to the caller.
    fn commit_count(&self, repo: &Path) -> Result<String, AnalysisError>;

    /// Returns the verbose per-commit log for every reachable ref.
    fn log_all_refs(&self, repo: &Path) -> Result<String, AnalysisError>;

    /// Returns the verbose per-commit log for the checked-out branch only.
    fn log_current_branch(&self, repo: &Path) -> Result<String, AnalysisError>;
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Uses `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Uses a specific git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the program this oracle invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn output(&self, repo: &Path, args: &[&str]) -> std::io::Result<Output> {
        debug!("Running {} -C {} {}", self.program, repo.display(), args.join(" "));

        // Keeps `status` from refreshing the index on disk.
        Command::new(&self.program)
            .arg("--no-optional-locks")
            .arg("-C")
            .arg(repo)
            .args(args)
            .stdin(Stdio::null())
            .output()
    }

    /// Runs a query and returns stdout, mapping failures to [`AnalysisError`].
    fn query(
        &self,
        repo: &Path,
        operation: &'static str,
        args: &[&str],
    ) -> Result<String, AnalysisError> {
        let output = self
            .output(repo, args)
            .map_err(|source| AnalysisError::Spawn {
                program: self.program.clone(),
                operation,
                repo: repo.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(AnalysisError::CommandFailed {
                operation,
                repo: repo.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn is_valid_repository(&self, dir: &Path) -> bool {
        if !dir.join(".git").exists() {
            return false;
        }

        match self.output(dir, &["status", "--porcelain"]) {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!("Could not run {} in {}: {e}", self.program, dir.display());
                false
            }
        }
    }

    fn commit_count(&self, repo: &Path) -> Result<String, AnalysisError> {
        self.query(repo, "rev-list --count HEAD", &["rev-list", "--count", "HEAD"])
    }

    fn log_all_refs(&self, repo: &Path) -> Result<String, AnalysisError> {
        self.query(
            repo,
            "log --all",
            &["log", "--format=fuller", "--no-color", "--all"],
        )
    }

    fn log_current_branch(&self, repo: &Path) -> Result<String, AnalysisError> {
        self.query(repo, "log", &["log", "--format=fuller", "--no-color"])
    }
}
