//! Record retrieval from the TRSS data API.
//!
//! The [`RecordFetcher`] trait is the only seam between the aggregation
//! pipeline and the data store. [`HttpRecordFetcher`] is the production
//! implementation backed by the TRSS REST endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;
use crate::models::{BuildRecord, BuildResult, HistoryEntry, TestResult};
use crate::services::links::query_string;

/// HTTP connect timeout for data API calls.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Restricts child builds to results that do not match a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultFilter {
    Exclude(BuildResult),
}

impl ResultFilter {
    /// Every result except SUCCESS.
    pub fn not_success() -> Self {
        Self::Exclude(BuildResult::Success)
    }

    /// Query parameter value understood by the data API (`!SUCCESS`).
    pub fn as_query_value(&self) -> String {
        match self {
            Self::Exclude(result) => format!("!{}", result),
        }
    }

    pub fn matches(&self, result: &BuildResult) -> bool {
        match self {
            Self::Exclude(excluded) => excluded != result,
        }
    }
}

/// Source of build, child-build and test-history records.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetch a build by id. `Ok(None)` means the build does not exist.
    async fn fetch_build(&self, id: &str) -> Result<Option<BuildRecord>, FetchError>;

    /// Fetch all descendant builds of `parent_id` whose result passes `filter`.
    async fn fetch_child_builds(
        &self,
        parent_id: &str,
        filter: &ResultFilter,
    ) -> Result<Vec<BuildRecord>, FetchError>;

    /// Fetch up to `limit` most recent executions of a test.
    async fn fetch_history(
        &self,
        test_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, FetchError>;

    /// Check that the data service is reachable.
    async fn ping(&self) -> Result<(), FetchError> {
        Ok(())
    }
}

/// History rows are returned as `{ "tests": { "testResult": ... } }`.
#[derive(Debug, Deserialize)]
struct HistoryRow {
    tests: HistoryRowTest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRowTest {
    test_result: TestResult,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry::new(row.tests.test_result)
    }
}

/// [`RecordFetcher`] backed by the TRSS REST API.
#[derive(Debug, Clone)]
pub struct HttpRecordFetcher {
    client: reqwest::Client,
    api_url: String,
}

impl HttpRecordFetcher {
    /// Build a fetcher for the API rooted at `api_url`.
    pub fn new(api_url: &str, request_timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: api_url.to_string(),
                cause: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(HttpRecordFetcher {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> String {
        format!("{}/api/{}?{}", self.api_url, path, query_string(query))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                cause: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            cause: e.to_string(),
        })
    }
}

#[async_trait]
impl RecordFetcher for HttpRecordFetcher {
    async fn fetch_build(&self, id: &str) -> Result<Option<BuildRecord>, FetchError> {
        let url = self.endpoint("getParents", &[("id", id)]);
        let builds: Vec<BuildRecord> = self.get_json(&url).await?;
        Ok(builds.into_iter().next())
    }

    async fn fetch_child_builds(
        &self,
        parent_id: &str,
        filter: &ResultFilter,
    ) -> Result<Vec<BuildRecord>, FetchError> {
        let build_result = filter.as_query_value();
        let url = self.endpoint(
            "getAllChildBuilds",
            &[("buildResult", build_result.as_str()), ("parentId", parent_id)],
        );
        self.get_json(&url).await
    }

    async fn fetch_history(
        &self,
        test_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, FetchError> {
        let limit = limit.to_string();
        let url = self.endpoint(
            "getHistoryPerTest",
            &[("testId", test_id), ("limit", limit.as_str())],
        );
        let rows: Vec<HistoryRow> = self.get_json(&url).await?;
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    /// Any HTTP answer counts as reachable; only transport failures do not.
    async fn ping(&self) -> Result<(), FetchError> {
        let url = self.endpoint("getParents", &[("id", "")]);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                cause: e.to_string(),
            })?;
        debug!("Data service answered ping with {}", response.status());
        Ok(())
    }
}
