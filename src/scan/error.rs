//! Error types for repository discovery and analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent discovery from starting at all.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("Directory {} does not exist", .0.display())]
    RootNotFound(PathBuf),

    /// The scan root exists but is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The scan root could not be read.
    #[error("Failed to read {}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Failures while analyzing a single repository.
///
/// These never abort a scan: the coordinator logs them and drops the
/// repository from the results.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The version-control program could not be started.
    #[error("Failed to run `{program} {operation}` in {}", .repo.display())]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Logical operation being performed.
        operation: &'static str,
        /// Repository the command ran against.
        repo: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The version-control program exited unsuccessfully.
    #[error("`{operation}` failed in {} ({status}): {stderr}", .repo.display())]
    CommandFailed {
        /// Logical operation being performed.
        operation: &'static str,
        /// Repository the command ran against.
        repo: PathBuf,
        /// Exit status description.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// Neither the all-refs log nor the current-branch log could be read.
    #[error("Error getting commit logs in {}", .repo.display())]
    LogUnavailable {
        /// Repository the log was requested from.
        repo: PathBuf,
        /// Failure of the current-branch fallback.
        #[source]
        source: Box<AnalysisError>,
    },
}

/// An invalid detection pattern.
#[derive(Error, Debug)]
#[error("Invalid pattern '{name}': {source}")]
pub struct PatternError {
    /// Name of the offending pattern.
    pub name: String,
    /// Regex compilation error.
    #[source]
    pub source: regex::Error,
}
