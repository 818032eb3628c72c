//! Per-test execution history.

use serde::{Deserialize, Serialize};

use super::build::TestResult;

/// One past execution of a test identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub test_result: TestResult,
}

impl HistoryEntry {
    pub fn new(test_result: TestResult) -> Self {
        HistoryEntry { test_result }
    }
}

/// Pass ratio over a test's history window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryTally {
    /// Number of PASSED entries
    pub total_passes: usize,
    /// Number of entries in the window
    pub total_count: usize,
}

impl HistoryTally {
    /// Count the PASSED entries of a history window.
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let total_passes = entries
            .iter()
            .filter(|e| e.test_result == TestResult::Passed)
            .count();

        HistoryTally {
            total_passes,
            total_count: entries.len(),
        }
    }
}

impl std::fmt::Display for HistoryTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.total_passes, self.total_count)
    }
}
