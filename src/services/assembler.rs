//! Release summary aggregation.
//!
//! Fetches the parent build, its failing descendants and the deep history
//! of every failed test, then folds everything into a [`ReportModel`].
//! History lookups are polled concurrently on the calling task and joined
//! before any fragment is composed; the first fetch error drops the
//! remaining lookups.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::{info, warn};

use crate::error::FetchError;
use crate::models::{
    BuildRecord, ClassificationBucket, HistoryTally, ReleaseSummary, ReportModel, TestRecord,
};
use crate::services::classifier::{self, ClassificationRules, TestSuiteBuild};
use crate::services::fetcher::{RecordFetcher, ResultFilter};
use crate::services::history::{DEFAULT_HISTORY_LIMIT, HistoryAggregator};
use crate::services::links::ReportLinks;
use crate::services::markdown;

/// Default number of history lookups in flight at once.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;

/// What to do when a single test's history cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFailurePolicy {
    /// Fail the whole report
    #[default]
    Abort,
    /// Render the test with an unknown history
    Degrade,
}

/// Tunables for the aggregation pipeline.
#[derive(Debug, Clone)]
pub struct AssemblerSettings {
    pub history_limit: usize,
    pub max_concurrent_fetches: usize,
    pub history_failure_policy: HistoryFailurePolicy,
    pub rules: ClassificationRules,
}

impl Default for AssemblerSettings {
    fn default() -> Self {
        AssemblerSettings {
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            history_failure_policy: HistoryFailurePolicy::Abort,
            rules: ClassificationRules::default(),
        }
    }
}

/// Builds release summary reports for parent builds.
#[derive(Clone)]
pub struct ReportAssembler {
    fetcher: Arc<dyn RecordFetcher>,
    history: HistoryAggregator,
    links: ReportLinks,
    settings: AssemblerSettings,
}

impl ReportAssembler {
    pub fn new(
        fetcher: Arc<dyn RecordFetcher>,
        links: ReportLinks,
        settings: AssemblerSettings,
    ) -> Self {
        let history = HistoryAggregator::new(fetcher.clone(), settings.history_limit);
        ReportAssembler {
            fetcher,
            history,
            links,
            settings,
        }
    }

    pub fn fetcher(&self) -> &Arc<dyn RecordFetcher> {
        &self.fetcher
    }

    /// Generate the markdown release summary for `parent_id`.
    pub async fn generate_release_summary(&self, parent_id: &str) -> Result<String, FetchError> {
        let model = self.assemble(parent_id, Utc::now()).await?;
        Ok(markdown::render(&model))
    }

    /// Aggregate all records under `parent_id` into a report model.
    pub async fn assemble(
        &self,
        parent_id: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportModel, FetchError> {
        let Some(parent) = self.fetcher.fetch_build(parent_id).await? else {
            info!(parent_id = %parent_id, "Parent build not found");
            return Ok(ReportModel::NotFound {
                parent_id: parent_id.to_string(),
            });
        };

        let header = markdown::header(&parent, parent_id, &self.links, generated_at);

        let children = self
            .fetcher
            .fetch_child_builds(parent_id, &ResultFilter::not_success())
            .await?;

        let classification = classifier::classify(&children, &self.settings.rules);
        info!(
            parent_id = %parent_id,
            failing_builds = classification.len(),
            test_suite_builds = classification.test_suite_builds.len(),
            failed_tests = classification.failed_test_count(),
            history_limit = self.history.limit(),
            "Classified child builds"
        );

        let tallies = self.collect_histories(&classification.test_suite_builds).await?;

        let mut buckets = ClassificationBucket::default();
        for plain in &classification.plain_builds {
            buckets
                .failed_build_summary
                .insert(plain.key.clone(), markdown::build_heading(plain.build));
        }

        let mut tallies = tallies.into_iter();
        for suite in &classification.test_suite_builds {
            let mut fragment = markdown::build_heading(suite.build);
            if let Some(rerun) = &suite.rerun {
                fragment.push_str(&markdown::rerun_line(rerun));
            }
            if let Some(java_version) = suite.java_version {
                fragment.push_str(&markdown::java_version_block(java_version));
            }
            for test in &suite.failed_tests {
                let tally = tallies.next().flatten();
                fragment.push_str(&markdown::failed_test_line(
                    &self.links,
                    suite.build,
                    test,
                    tally,
                ));
            }
            buckets.failed_test_summary.insert(suite.key.clone(), fragment);
        }

        Ok(ReportModel::Summary(ReleaseSummary::new(header, buckets)))
    }

    /// Tallies for every failed test, flattened in suite then record order.
    async fn collect_histories(
        &self,
        suites: &[TestSuiteBuild<'_>],
    ) -> Result<Vec<Option<HistoryTally>>, FetchError> {
        let lookups: Vec<(&BuildRecord, &TestRecord)> = suites
            .iter()
            .flat_map(|suite| suite.failed_tests.iter().map(move |test| (suite.build, *test)))
            .collect();

        if lookups.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = self.settings.max_concurrent_fetches.max(1);
        stream::iter(lookups)
            .map(|(build, test)| self.lookup_history(build, test))
            .buffered(concurrency)
            .try_collect()
            .await
    }

    async fn lookup_history(
        &self,
        build: &BuildRecord,
        test: &TestRecord,
    ) -> Result<Option<HistoryTally>, FetchError> {
        match self.history.aggregate(&test.id).await {
            Ok(tally) => Ok(Some(tally)),
            Err(e) if self.settings.history_failure_policy == HistoryFailurePolicy::Degrade => {
                warn!(
                    build = %build.build_name,
                    test = %test.test_name,
                    "History lookup failed, rendering as unknown: {}",
                    e
                );
                Ok(None)
            }
            Err(e) => {
                warn!(
                    build = %build.build_name,
                    test = %test.test_name,
                    "History lookup failed, aborting report: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
