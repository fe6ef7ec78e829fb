//! Shared test utilities for the `scan` module.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::scan::error::AnalysisError;
use crate::scan::vcs::VersionControl;

/// Scripted answers for one fake repository.
///
/// `None` in any query slot makes that query fail the way `git` does.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeRepo {
    pub valid: bool,
    pub count: Option<String>,
    pub log_all: Option<String>,
    pub log_branch: Option<String>,
}

impl FakeRepo {
    /// A valid repository with `count` commits and the given log on every ref.
    pub(crate) fn with_log(count: u64, log: &str) -> Self {
        Self {
            valid: true,
            count: Some(format!("{count}\n")),
            log_all: Some(log.to_string()),
            log_branch: Some(log.to_string()),
        }
    }

    /// A repository whose HEAD is unborn, so counting fails.
    pub(crate) fn unborn() -> Self {
        Self {
            valid: true,
            ..Self::default()
        }
    }
}

/// In-memory [`VersionControl`] that records calls and concurrency.
#[derive(Default)]
pub(crate) struct FakeVcs {
    repos: HashMap<PathBuf, FakeRepo>,
    calls: Mutex<Vec<(PathBuf, &'static str)>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeVcs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_repo(mut self, path: impl Into<PathBuf>, repo: FakeRepo) -> Self {
        self.repos.insert(path.into(), repo);
        self
    }

    /// Makes every commit count query sleep, to widen concurrency windows.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Operations invoked so far, in call order.
    pub(crate) fn calls(&self) -> Vec<(PathBuf, &'static str)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls for a given operation across all repositories.
    pub(crate) fn call_count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|(_, op)| *op == operation).count()
    }

    /// Highest number of commit count queries that overlapped.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, repo: &Path, operation: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((repo.to_path_buf(), operation));
        }
    }

    fn answer(
        &self,
        repo: &Path,
        operation: &'static str,
        pick: impl Fn(&FakeRepo) -> Option<String>,
    ) -> Result<String, AnalysisError> {
        self.record(repo, operation);
        self.repos
            .get(repo)
            .and_then(pick)
            .ok_or_else(|| AnalysisError::CommandFailed {
                operation,
                repo: repo.to_path_buf(),
                status: "exit status: 128".to_string(),
                stderr: "fatal: scripted failure".to_string(),
            })
    }
}

impl VersionControl for FakeVcs {
    fn is_valid_repository(&self, dir: &Path) -> bool {
        self.record(dir, "status");
        self.repos.get(dir).is_some_and(|r| r.valid)
    }

    fn commit_count(&self, repo: &Path) -> Result<String, AnalysisError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let result = self.answer(repo, "count", |r| r.count.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn log_all_refs(&self, repo: &Path) -> Result<String, AnalysisError> {
        self.answer(repo, "log --all", |r| r.log_all.clone())
    }

    fn log_current_branch(&self, repo: &Path) -> Result<String, AnalysisError> {
        self.answer(repo, "log", |r| r.log_branch.clone())
    }
}
