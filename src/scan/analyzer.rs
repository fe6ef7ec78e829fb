//! Per-repository co-author analysis.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scan::error::AnalysisError;
use crate::scan::patterns::PatternSet;
use crate::scan::vcs::VersionControl;

/// Findings for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryResult {
    /// Repository root as discovered.
    pub path: PathBuf,
    /// Commits reachable from HEAD.
    pub total_commits: u64,
    /// Log lines matching a suspicious pattern.
    pub suspicious_commits: u64,
    /// Distinct matched trailers, in first-seen order.
    pub suspicious_authors: Vec<String>,
}

impl RepositoryResult {
    /// An empty result for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            total_commits: 0,
            suspicious_commits: 0,
            suspicious_authors: Vec::new(),
        }
    }

    /// Returns `true` if any suspicious trailer was found.
    pub fn is_contaminated(&self) -> bool {
        self.suspicious_commits > 0
    }
}

/// Counts of suspicious trailers found in a block of log text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFindings {
    /// Number of matches.
    pub matches: u64,
    /// Distinct trimmed matched texts, in first-seen order.
    pub authors: Vec<String>,
}

/// Analyzes single repositories against a pattern set.
pub struct RepositoryAnalyzer {
    vcs: Arc<dyn VersionControl>,
    patterns: Arc<PatternSet>,
}

impl RepositoryAnalyzer {
    /// Creates an analyzer using `vcs` for queries and `patterns` for matching.
    pub fn new(vcs: Arc<dyn VersionControl>, patterns: Arc<PatternSet>) -> Self {
        Self { vcs, patterns }
    }

    /// Returns the pattern set in use.
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Analyzes the repository at `repo`.
    ///
    /// An empty history short-circuits without reading the log. When the
    /// all-refs log cannot be read, the current branch's log is used instead.
    pub fn analyze(&self, repo: &Path) -> Result<RepositoryResult, AnalysisError> {
        let mut result = RepositoryResult::new(repo);

        let count_output = self.vcs.commit_count(repo)?;
        result.total_commits = parse_commit_count(&count_output);

        if result.total_commits == 0 {
            return Ok(result);
        }

        let log = self.read_log(repo)?;
        let findings = self.scan_log(&log);
        result.suspicious_commits = findings.matches;
        result.suspicious_authors = findings.authors;

        debug!(
            "{}: {} commits, {} suspicious",
            repo.display(),
            result.total_commits,
            result.suspicious_commits
        );

        Ok(result)
    }

    fn read_log(&self, repo: &Path) -> Result<String, AnalysisError> {
        match self.vcs.log_all_refs(repo) {
            Ok(log) => Ok(log),
            Err(e) => {
                debug!("All-refs log failed for {}, using current branch: {e}", repo.display());
                self.vcs
                    .log_current_branch(repo)
                    .map_err(|source| AnalysisError::LogUnavailable {
                        repo: repo.to_path_buf(),
                        source: Box::new(source),
                    })
            }
        }
    }

    /// Scans log text line by line.
    ///
    /// Every pattern hit on a line counts once. Hits from different patterns
    /// that cover the identical trailer text on the same line are one hit.
    pub fn scan_log(&self, log: &str) -> LogFindings {
        let mut findings = LogFindings::default();
        let mut recorded: HashSet<String> = HashSet::new();

        for line in log.lines() {
            let mut on_line: Vec<&str> = Vec::new();

            for m in self.patterns.matches(line) {
                let text = m.text.trim();
                // A vendor-name pattern and the vendor-domain pattern both span
                // `Co-authored-by: Claude <noreply@anthropic.com>`. Counting that
                // twice would make a Claude trailer plus a Copilot trailer
                // report 3 instead of 2.
                if on_line.contains(&text) {
                    continue;
                }
                on_line.push(text);
                findings.matches += 1;

                if recorded.insert(text.to_string()) {
                    findings.authors.push(text.to_string());
                }
            }
        }

        findings
    }
}

/// Leniently parses commit count output: leading digits after trimming,
/// anything else is zero.
pub fn parse_commit_count(output: &str) -> u64 {
    let trimmed = output.trim();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);

    digits.parse().unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::scan::test_utils::{FakeRepo, FakeVcs};

    const CONTAMINATED_LOG: &str = "\
commit 1111111111111111111111111111111111111111
Author:     Dev <dev@example.com>
AuthorDate: Mon Sep 22 10:00:00 2025 +0200
Commit:     Dev <dev@example.com>
CommitDate: Mon Sep 22 10:00:00 2025 +0200

    Add parser

    Co-authored-by: Claude <noreply@anthropic.com>

commit 2222222222222222222222222222222222222222
Author:     Dev <dev@example.com>
AuthorDate: Sun Sep 21 10:00:00 2025 +0200
Commit:     Dev <dev@example.com>
CommitDate: Sun Sep 21 10:00:00 2025 +0200

    Fix tests

    Co-authored-by: GitHub Copilot <copilot@github.com>
";

    fn analyzer(vcs: Arc<FakeVcs>) -> RepositoryAnalyzer {
        RepositoryAnalyzer::new(vcs, PatternSet::builtin())
    }

    #[test]
    fn reports_trailers_in_first_seen_order() {
        let vcs = Arc::new(FakeVcs::new().with_repo("/r", FakeRepo::with_log(5, CONTAMINATED_LOG)));

        let result = analyzer(vcs).analyze(Path::new("/r")).unwrap();

        assert_eq!(result.path, PathBuf::from("/r"));
        assert_eq!(result.total_commits, 5);
        assert_eq!(result.suspicious_commits, 2);
        assert_eq!(
            result.suspicious_authors,
            vec![
                "Co-authored-by: Claude <noreply@anthropic.com>".to_string(),
                "Co-authored-by: GitHub Copilot <copilot@github.com>".to_string(),
            ]
        );
        assert!(result.is_contaminated());
    }

    #[test]
    fn empty_history_skips_log() {
        let vcs = Arc::new(FakeVcs::new().with_repo("/empty", FakeRepo::with_log(0, CONTAMINATED_LOG)));

        let result = analyzer(vcs.clone()).analyze(Path::new("/empty")).unwrap();

        assert_eq!(result, RepositoryResult::new("/empty"));
        assert_eq!(vcs.call_count("log --all"), 0);
        assert_eq!(vcs.call_count("log"), 0);
    }

    #[test]
    fn failed_count_is_an_error() {
        let vcs = Arc::new(FakeVcs::new().with_repo("/unborn", FakeRepo::unborn()));

        let err = analyzer(vcs).analyze(Path::new("/unborn")).unwrap_err();

        assert!(matches!(err, AnalysisError::CommandFailed { .. }));
    }

    #[test]
    fn falls_back_to_current_branch_log() {
        let repo = FakeRepo {
            log_all: None,
            ..FakeRepo::with_log(5, CONTAMINATED_LOG)
        };
        let vcs = Arc::new(FakeVcs::new().with_repo("/r", repo));

        let result = analyzer(vcs.clone()).analyze(Path::new("/r")).unwrap();

        assert_eq!(result.suspicious_commits, 2);
        assert_eq!(vcs.call_count("log --all"), 1);
        assert_eq!(vcs.call_count("log"), 1);
    }

    #[test]
    fn both_logs_failing_is_an_error() {
        let repo = FakeRepo {
            valid: true,
            count: Some("3".to_string()),
            log_all: None,
            log_branch: None,
        };
        let vcs = Arc::new(FakeVcs::new().with_repo("/r", repo));

        let err = analyzer(vcs).analyze(Path::new("/r")).unwrap_err();

        assert!(matches!(err, AnalysisError::LogUnavailable { .. }));
    }

    #[test]
    fn malformed_count_is_treated_as_empty() {
        let repo = FakeRepo {
            count: Some("not a number\n".to_string()),
            ..FakeRepo::with_log(0, CONTAMINATED_LOG)
        };
        let vcs = Arc::new(FakeVcs::new().with_repo("/r", repo));

        let result = analyzer(vcs).analyze(Path::new("/r")).unwrap();

        assert_eq!(result.total_commits, 0);
        assert_eq!(result.suspicious_commits, 0);
        assert!(result.suspicious_authors.is_empty());
    }

    #[test]
    fn repeated_trailers_are_counted_but_listed_once() {
        let log = "    Co-authored-by: Gemini <bot@example.com>\n\
                   \n\
                   \x20   Co-authored-by: Gemini <bot@example.com>\n";
        let vcs = Arc::new(FakeVcs::new());

        let findings = analyzer(vcs).scan_log(log);

        assert_eq!(findings.matches, 2);
        assert_eq!(
            findings.authors,
            vec!["Co-authored-by: Gemini <bot@example.com>".to_string()]
        );
    }

    #[test]
    fn counting_is_per_line_not_per_commit() {
        let log = "commit 1\n\
                   \x20   Co-authored-by: Claude <noreply@anthropic.com>\n\
                   \x20   Co-authored-by: Mistral <bot@example.com>\n";
        let vcs = Arc::new(FakeVcs::new());

        let findings = analyzer(vcs).scan_log(log);

        assert_eq!(findings.matches, 2);
        assert_eq!(findings.authors.len(), 2);
    }

    #[test]
    fn distinct_pattern_hits_on_one_line_all_count() {
        let patterns = PatternSet::new([
            ("short", r"co-authored-by:\s*claude"),
            ("domain", r"co-authored-by:[^<]*<[^>]*@anthropic\.com>"),
        ])
        .unwrap();
        let vcs: Arc<dyn VersionControl> = Arc::new(FakeVcs::new());
        let analyzer = RepositoryAnalyzer::new(vcs, Arc::new(patterns));

        let findings = analyzer.scan_log("Co-authored-by: Claude <noreply@anthropic.com>");

        assert_eq!(findings.matches, 2);
        assert_eq!(
            findings.authors,
            vec![
                "Co-authored-by: Claude".to_string(),
                "Co-authored-by: Claude <noreply@anthropic.com>".to_string(),
            ]
        );
    }

    #[test]
    fn clean_log_has_no_findings() {
        let log = "commit 1\nAuthor: Dev <dev@example.com>\n\n    Refactor\n\n    Co-authored-by: Jane <jane@example.com>\n";
        let vcs = Arc::new(FakeVcs::new().with_repo("/clean", FakeRepo::with_log(1, log)));

        let result = analyzer(vcs).analyze(Path::new("/clean")).unwrap();

        assert_eq!(result.total_commits, 1);
        assert!(!result.is_contaminated());
        assert!(result.suspicious_authors.is_empty());
    }

    #[test]
    fn analysis_is_repeatable() {
        let vcs = Arc::new(FakeVcs::new().with_repo("/r", FakeRepo::with_log(5, CONTAMINATED_LOG)));
        let analyzer = analyzer(vcs);

        let first = analyzer.analyze(Path::new("/r")).unwrap();
        let second = analyzer.analyze(Path::new("/r")).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn parse_commit_count_is_lenient() {
        assert_eq!(parse_commit_count("42\n"), 42);
        assert_eq!(parse_commit_count("  7  "), 7);
        assert_eq!(parse_commit_count("12abc"), 12);
        assert_eq!(parse_commit_count(""), 0);
        assert_eq!(parse_commit_count("abc"), 0);
        assert_eq!(parse_commit_count("-3"), 0);
    }
}
