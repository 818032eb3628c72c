//! Domain models for the release summary report.

pub mod build;
pub mod history;
pub mod report;

// Re-export commonly used types
pub use build::{BuildRecord, BuildResult, TestRecord, TestResult};
pub use history::{HistoryEntry, HistoryTally};
pub use report::{BuildKey, ClassificationBucket, ReleaseSummary, ReportModel};
