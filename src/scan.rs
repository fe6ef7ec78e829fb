//! Repository discovery and co-author analysis.

pub mod analyzer;
pub mod coordinator;
pub mod error;
pub mod locator;
pub mod patterns;
pub mod vcs;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analyzer::{parse_commit_count, LogFindings, RepositoryAnalyzer, RepositoryResult};
pub use coordinator::{default_concurrency, AnalysisCoordinator};
pub use error::{AnalysisError, PatternError, ScanError};
pub use locator::{RepositoryLocator, METADATA_DIR};
pub use patterns::{Pattern, PatternMatch, PatternSet};
pub use vcs::{GitCli, VersionControl};
