//! Report rendering for the scan command.
//!
//! Pure functions so the exact text layout can be unit tested.

use anyhow::{Context, Result};

use crate::data::report::{OutputFormat, ScanReport};

const HEAVY_RULE_WIDTH: usize = 79;
const LIGHT_RULE_WIDTH: usize = 39;

/// Renders a report in the requested format.
pub fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text_report(report)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).context("Failed to serialize report to YAML")
        }
    }
}

/// Renders the human-readable report.
pub fn render_text_report(report: &ScanReport) -> String {
    let heavy = "=".repeat(HEAVY_RULE_WIDTH);
    let light = "-".repeat(LIGHT_RULE_WIDTH);
    let summary = &report.summary;
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("{heavy}\n"));
    out.push_str("SECURE GIT - SUSPICIOUS CO-AUTHOR REPORT\n");
    out.push_str(&format!("{heavy}\n\n"));

    out.push_str("\u{1f4ca} GENERAL STATISTICS\n");
    out.push_str(&format!(
        "   Repositories analyzed: {}\n",
        summary.repositories_analyzed
    ));
    out.push_str(&format!(
        "   Contaminated repositories: {}\n",
        summary.contaminated_repositories
    ));
    out.push_str(&format!("   Clean repositories: {}\n\n", summary.clean_repositories));

    if report.has_contamination() {
        out.push_str("\u{1f4db} CONTAMINATED REPOSITORIES\n");
        out.push_str(&format!("{light}\n"));

        for result in report.contaminated() {
            out.push('\n');
            out.push_str(&format!("\u{1f4c1} {}\n", result.path.display()));
            out.push_str(&format!("   Total commits: {}\n", result.total_commits));
            out.push_str(&format!(
                "   Suspicious commits: {}\n",
                result.suspicious_commits
            ));

            if !result.suspicious_authors.is_empty() {
                out.push_str("   Detected co-authors:\n");
                for author in &result.suspicious_authors {
                    out.push_str(&format!("     \u{2022} {author}\n"));
                }
            }
        }
        out.push('\n');
    }

    if summary.clean_repositories > 0 {
        out.push_str("\u{2705} CLEAN REPOSITORIES\n");
        out.push_str(&format!("{light}\n"));

        for result in report.clean() {
            out.push_str(&format!(
                "   {} ({} commits)\n",
                result.path.display(),
                result.total_commits
            ));
        }
        out.push('\n');
    }

    if report.has_contamination() {
        out.push_str(&format_security_alert(
            summary.contaminated_repositories,
            summary.suspicious_commits,
        ));
    } else {
        out.push_str("\u{1f389} ALL REPOSITORIES ARE CLEAN\n");
    }

    out
}

/// Returns the closing alert with remediation advice.
fn format_security_alert(contaminated: usize, suspicious_commits: u64) -> String {
    let mut out = String::new();

    out.push_str("\u{1f6a8} SECURITY ALERT\n");
    out.push_str(&format!(
        "   {contaminated} contaminated repositories were found\n"
    ));
    out.push_str(&format!(
        "   with a total of {suspicious_commits} suspicious commits\n\n"
    ));

    out.push_str("\u{26a0}\u{fe0f}  RECOMMENDATIONS AND WARNINGS\n");
    out.push_str("   1. BACK UP THE .git DIRECTORY BEFORE PROCEEDING\n");
    out.push_str("   2. Review suspicious commits using: git log --format=fuller\n");
    out.push_str("   3. Consider rewriting history with: git rebase -i\n");
    out.push_str("   4. Configure Git hooks to prevent future contamination\n\n");

    out.push_str("\u{26a0}\u{fe0f}  IMPORTANT WARNING\n");
    out.push_str("   Modifying commit history is a delicate process\n");
    out.push_str("   that can lead to data loss if not handled properly.\n");
    out.push_str("   Make sure you have advanced Git knowledge before proceeding.\n\n");

    out
}
