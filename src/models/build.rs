//! Build and test records as returned by the TRSS data API.

use serde::{Deserialize, Deserializer, Serialize};

/// Jenkins build outcome.
///
/// Unrecognised values are preserved verbatim so that they can be echoed
/// back into the report exactly as the data service reported them. A null
/// result (a build still running) reads as an empty `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum BuildResult {
    Success,
    Failure,
    Failed,
    Unstable,
    Aborted,
    Other(String),
}

impl BuildResult {
    /// Convert to the wire string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Failed => "FAILED",
            Self::Unstable => "UNSTABLE",
            Self::Aborted => "ABORTED",
            Self::Other(s) => s,
        }
    }

    /// Parse from the wire string representation.
    pub fn parse(s: &str) -> Self {
        match s {
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            "FAILED" => Self::Failed,
            "UNSTABLE" => Self::Unstable,
            "ABORTED" => Self::Aborted,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Default for BuildResult {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<Option<String>> for BuildResult {
    fn from(s: Option<String>) -> Self {
        s.map(|s| Self::parse(&s)).unwrap_or_default()
    }
}

impl From<BuildResult> for String {
    fn from(result: BuildResult) -> Self {
        result.as_str().to_string()
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a single test inside a build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
    Disabled,
    Other(String),
}

impl TestResult {
    /// Convert to the wire string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Disabled => "DISABLED",
            Self::Other(s) => s,
        }
    }

    /// Parse from the wire string representation.
    pub fn parse(s: &str) -> Self {
        match s {
            "PASSED" => Self::Passed,
            "FAILED" => Self::Failed,
            "SKIPPED" => Self::Skipped,
            "DISABLED" => Self::Disabled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<Option<String>> for TestResult {
    fn from(s: Option<String>) -> Self {
        Self::parse(s.as_deref().unwrap_or_default())
    }
}

impl From<TestResult> for String {
    fn from(result: TestResult) -> Self {
        result.as_str().to_string()
    }
}

impl std::fmt::Display for TestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single test executed by a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub test_name: String,
    pub test_result: TestResult,
}

/// A Jenkins build as stored by TRSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub build_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub build_url: String,
    #[serde(default)]
    pub build_result: BuildResult,
    /// Build start time in epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_by: Option<String>,
    /// Captured `java -version` output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerun_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerun_failed_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tests: Vec<TestRecord>,
}

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BuildRecord {
    /// Create a build with no tests and no optional metadata.
    pub fn new(id: &str, build_name: &str, build_url: &str, build_result: BuildResult) -> Self {
        BuildRecord {
            id: id.to_string(),
            build_name: build_name.to_string(),
            build_url: build_url.to_string(),
            build_result,
            timestamp: None,
            start_by: None,
            java_version: None,
            rerun_link: None,
            rerun_failed_link: None,
            tests: Vec::new(),
        }
    }

    /// Tests with a FAILED outcome, in record order.
    pub fn failed_tests(&self) -> impl Iterator<Item = &TestRecord> {
        self.tests
            .iter()
            .filter(|t| t.test_result == TestResult::Failed)
    }
}
