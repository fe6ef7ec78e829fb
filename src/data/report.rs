//! Scan report types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scan::RepositoryResult;

/// Complete report for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Version of secure-git that produced the report.
    pub version: String,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Summary statistics.
    pub summary: ScanSummary,
    /// Per-repository results, sorted by path.
    pub repositories: Vec<RepositoryResult>,
}

/// Summary statistics for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Repositories with a result.
    pub repositories_analyzed: usize,
    /// Repositories with at least one suspicious match.
    pub contaminated_repositories: usize,
    /// Repositories without matches.
    pub clean_repositories: usize,
    /// Suspicious matches across contaminated repositories.
    pub suspicious_commits: u64,
}

impl ScanSummary {
    /// Creates a summary from a list of repository results.
    pub fn from_results(results: &[RepositoryResult]) -> Self {
        let repositories_analyzed = results.len();
        let contaminated_repositories = results.iter().filter(|r| r.is_contaminated()).count();
        let suspicious_commits = results.iter().map(|r| r.suspicious_commits).sum();

        Self {
            repositories_analyzed,
            contaminated_repositories,
            clean_repositories: repositories_analyzed - contaminated_repositories,
            suspicious_commits,
        }
    }
}

impl ScanReport {
    /// Creates a report, ordering repositories by path.
    pub fn new(mut repositories: Vec<RepositoryResult>) -> Self {
        repositories.sort_by(|a, b| a.path.cmp(&b.path));
        let summary = ScanSummary::from_results(&repositories);

        Self {
            version: crate::VERSION.to_string(),
            generated_at: Utc::now(),
            summary,
            repositories,
        }
    }

    /// Checks if any repository is contaminated.
    #[must_use]
    pub fn has_contamination(&self) -> bool {
        self.summary.contaminated_repositories > 0
    }

    /// Contaminated repositories, in report order.
    pub fn contaminated(&self) -> impl Iterator<Item = &RepositoryResult> {
        self.repositories.iter().filter(|r| r.is_contaminated())
    }

    /// Clean repositories, in report order.
    pub fn clean(&self) -> impl Iterator<Item = &RepositoryResult> {
        self.repositories.iter().filter(|r| !r.is_contaminated())
    }

    /// Determines exit code based on report and options.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.has_contamination() {
            1
        } else {
            0
        }
    }
}

/// Output format for scan reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}
