//! Deep-history pass ratio for a single test.

use std::sync::Arc;

use tracing::debug;

use crate::error::FetchError;
use crate::models::HistoryTally;
use crate::services::fetcher::RecordFetcher;

/// Default size of the history window.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Computes pass/total tallies over a test's recent executions.
#[derive(Clone)]
pub struct HistoryAggregator {
    fetcher: Arc<dyn RecordFetcher>,
    limit: usize,
}

impl HistoryAggregator {
    pub fn new(fetcher: Arc<dyn RecordFetcher>, limit: usize) -> Self {
        HistoryAggregator { fetcher, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch the history window for `test_id` and count its passes.
    ///
    /// Fetch failures are returned untouched; the caller decides whether
    /// to degrade or abort.
    pub async fn aggregate(&self, test_id: &str) -> Result<HistoryTally, FetchError> {
        let history = self.fetcher.fetch_history(test_id, self.limit).await?;
        let tally = HistoryTally::from_entries(&history);
        debug!(test_id = %test_id, tally = %tally, "Aggregated test history");
        Ok(tally)
    }
}
