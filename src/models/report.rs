//! Intermediate report model, fully materialized before rendering.

use std::collections::BTreeMap;

/// Bucket key for a child build.
///
/// `index` is the build's position in the fetched child sequence, so two
/// builds sharing a name occupy distinct keys. Ordering is by name first,
/// then by index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildKey {
    pub build_name: String,
    pub index: usize,
}

impl BuildKey {
    pub fn new(build_name: &str, index: usize) -> Self {
        BuildKey {
            build_name: build_name.to_string(),
            index,
        }
    }
}

/// Composed text fragments for failing child builds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationBucket {
    /// Plain (non test-suite) builds
    pub failed_build_summary: BTreeMap<BuildKey, String>,
    /// Test-suite builds with their failed-test lines
    pub failed_test_summary: BTreeMap<BuildKey, String>,
}

impl ClassificationBucket {
    pub fn is_empty(&self) -> bool {
        self.failed_build_summary.is_empty() && self.failed_test_summary.is_empty()
    }
}

/// Aggregated report for an existing parent build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    pub header: String,
    pub build_buckets: ClassificationBucket,
    pub has_failures: bool,
}

impl ReleaseSummary {
    pub fn new(header: String, build_buckets: ClassificationBucket) -> Self {
        let has_failures = !build_buckets.is_empty();
        ReleaseSummary {
            header,
            build_buckets,
            has_failures,
        }
    }
}

/// Outcome of aggregating one parent build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportModel {
    /// The parent build does not exist; terminal state.
    NotFound { parent_id: String },
    Summary(ReleaseSummary),
}
