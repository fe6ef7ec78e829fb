//! Repository discovery.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::scan::error::ScanError;
use crate::scan::vcs::VersionControl;

/// Name of the repository metadata directory.
pub const METADATA_DIR: &str = ".git";

/// Finds repository roots below a directory.
pub struct RepositoryLocator {
    vcs: Arc<dyn VersionControl>,
}

impl RepositoryLocator {
    /// Creates a locator that validates candidates with `vcs`.
    pub fn new(vcs: Arc<dyn VersionControl>) -> Self {
        Self { vcs }
    }

    /// Recursively collects every valid repository root under `root`.
    ///
    /// A relative `root` is resolved against the working directory, so every
    /// returned path is absolute.
    ///
    /// Entries that cannot be read are skipped and the walk carries on with
    /// their siblings. Only a missing or unreadable `root` is an error.
    /// Matched metadata directories are never descended into.
    pub fn locate(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let root = absolute_root(root)?;
        check_root(&root)?;

        let mut repos = Vec::new();
        let mut walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    trace!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            if entry.depth() == 0
                || !entry.file_type().is_dir()
                || entry.file_name() != METADATA_DIR
            {
                continue;
            }

            walker.skip_current_dir();

            let Some(candidate) = entry.path().parent() else {
                continue;
            };

            if self.vcs.is_valid_repository(candidate) {
                debug!("Found repository: {}", candidate.display());
                repos.push(candidate.to_path_buf());
            } else {
                debug!("Ignoring invalid repository: {}", candidate.display());
            }
        }

        Ok(repos)
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf, ScanError> {
    std::path::absolute(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(root).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ScanError::RootNotFound(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source,
        },
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    fs::read_dir(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(())
}
