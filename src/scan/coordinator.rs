//! Bounded-parallel analysis of many repositories.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::scan::analyzer::{RepositoryAnalyzer, RepositoryResult};

/// Returns the host's available parallelism, or 1 if it cannot be determined.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Runs a [`RepositoryAnalyzer`] over many repositories at once.
pub struct AnalysisCoordinator {
    analyzer: Arc<RepositoryAnalyzer>,
    concurrency: usize,
}

impl AnalysisCoordinator {
    /// Creates a coordinator limited to the host's parallelism.
    pub fn new(analyzer: Arc<RepositoryAnalyzer>) -> Self {
        Self::with_concurrency(analyzer, default_concurrency())
    }

    /// Creates a coordinator running at most `concurrency` analyses at once.
    ///
    /// A limit of zero is raised to one.
    pub fn with_concurrency(analyzer: Arc<RepositoryAnalyzer>, concurrency: usize) -> Self {
        Self {
            analyzer,
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum number of analyses in flight.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Analyzes every repository and returns the successful results.
    ///
    /// Failed analyses are logged and left out. Each analysis runs on the
    /// blocking pool while it holds a permit, and this returns only after all
    /// of them have finished.
    pub async fn analyze_all(&self, repos: Vec<PathBuf>) -> Vec<RepositoryResult> {
        let total = repos.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let futs: Vec<_> = repos
            .into_iter()
            .map(|repo| {
                let sem = semaphore.clone();
                let analyzer = self.analyzer.clone();

                async move {
                    let _permit = match sem.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            warn!("Skipping {}: semaphore closed: {e}", repo.display());
                            return None;
                        }
                    };

                    let task_repo = repo.clone();
                    let outcome =
                        tokio::task::spawn_blocking(move || analyzer.analyze(&task_repo)).await;

                    match outcome {
                        Ok(Ok(result)) => Some(result),
                        Ok(Err(e)) => {
                            warn!("Error analyzing repository {}: {e}", repo.display());
                            None
                        }
                        Err(e) => {
                            warn!("Analysis of {} did not complete: {e}", repo.display());
                            None
                        }
                    }
                }
            })
            .collect();

        let results: Vec<RepositoryResult> = futures::future::join_all(futs)
            .await
            .into_iter()
            .flatten()
            .collect();

        info!(
            "Analyzed {}/{total} repositories (concurrency: {})",
            results.len(),
            self.concurrency
        );

        results
    }
}
