//! # secure-git
//!
//! Finds Git repositories under a directory and flags commits whose
//! `Co-authored-by:` trailers name AI coding assistants or AI vendor email
//! domains.
//!
//! ## Pipeline
//!
//! - [`scan::RepositoryLocator`] walks the tree for `.git` directories.
//! - [`scan::AnalysisCoordinator`] analyzes repositories in parallel.
//! - [`scan::RepositoryAnalyzer`] reads each log through `git` and matches
//!   it against a [`scan::PatternSet`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use secure_git::scan::{
//!     AnalysisCoordinator, GitCli, PatternSet, RepositoryAnalyzer, RepositoryLocator,
//!     VersionControl,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let git: Arc<dyn VersionControl> = Arc::new(GitCli::new());
//! let repos = RepositoryLocator::new(git.clone()).locate(Path::new("/home/dev/src"))?;
//!
//! let analyzer = Arc::new(RepositoryAnalyzer::new(git, PatternSet::builtin()));
//! for result in AnalysisCoordinator::new(analyzer).analyze_all(repos).await {
//!     println!("{}: {}", result.path.display(), result.suspicious_commits);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod scan;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of secure-git.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
