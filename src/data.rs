//! Report data structures.

pub mod report;

pub use report::{OutputFormat, ScanReport, ScanSummary};
