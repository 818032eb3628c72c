//! URLs into the TRSS web UI embedded in the report.

/// Build a query string from key/value pairs, percent-encoding each value.
///
/// Everything outside `A-Z a-z 0-9 - _ . ~` is escaped, including
/// `! * ' ( )`.
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Link builder rooted at the public TRSS origin.
#[derive(Debug, Clone)]
pub struct ReportLinks {
    origin: String,
}

impl ReportLinks {
    pub fn new(origin: &str) -> Self {
        ReportLinks {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Build detail view filtered to failed test builds.
    pub fn build_detail(&self, parent_id: &str) -> String {
        format!(
            "{}/buildDetail?parentId={}&testSummaryResult=failed&buildNameRegex=%5ETest",
            self.origin, parent_id
        )
    }

    /// Grid view of all results under the parent.
    pub fn grid_view(&self, parent_id: &str) -> String {
        format!("{}/resultSummary?parentId={}", self.origin, parent_id)
    }

    pub fn test_output(&self, test_id: &str) -> String {
        format!("{}/output/test?id={}", self.origin, test_id)
    }

    pub fn deep_history(&self, test_id: &str) -> String {
        format!("{}/deepHistory?testId={}", self.origin, test_id)
    }

    /// Known-issue lookup for a failing test.
    pub fn possible_issues(
        &self,
        build_id: &str,
        build_name: &str,
        test_id: &str,
        test_name: &str,
    ) -> String {
        format!(
            "{}/possibleIssues?{}",
            self.origin,
            query_string(&[
                ("buildId", build_id),
                ("buildName", build_name),
                ("testId", test_id),
                ("testName", test_name),
            ])
        )
    }
}
