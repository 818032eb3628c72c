//! Classification of failing child builds.
//!
//! Pure functions over [`BuildRecord`] fields: no I/O happens here, so the
//! history fan-out in the assembler is scoped entirely by what this module
//! decides.

use crate::models::{BuildKey, BuildRecord, TestRecord};

/// Name prefix of automated test-execution jobs.
pub const TEST_BUILD_PREFIX: &str = "Test_openjdk";

/// Marker in the name of list/aggregator builds whose tests are reported elsewhere.
pub const TEST_LIST_MARKER: &str = "_testList";

/// Naming conventions used to classify builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRules {
    pub test_build_prefix: String,
    pub test_list_marker: String,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        ClassificationRules {
            test_build_prefix: TEST_BUILD_PREFIX.to_string(),
            test_list_marker: TEST_LIST_MARKER.to_string(),
        }
    }
}

impl ClassificationRules {
    pub fn is_test_suite(&self, build: &BuildRecord) -> bool {
        build.build_name.starts_with(&self.test_build_prefix)
    }

    pub fn is_test_list(&self, build: &BuildRecord) -> bool {
        build.build_name.contains(&self.test_list_marker)
    }
}

/// How to rerun a failing test-suite build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerunGuidance<'a> {
    /// Rerun only the failed tests
    Failed(&'a str),
    /// Rerun the whole build
    All(&'a str),
}

impl<'a> RerunGuidance<'a> {
    /// Prefer the rerun-failed link, fall back to rerun-all.
    pub fn for_build(build: &'a BuildRecord) -> Option<Self> {
        match (&build.rerun_failed_link, &build.rerun_link) {
            (Some(failed), _) if !failed.is_empty() => Some(Self::Failed(failed)),
            (_, Some(all)) if !all.is_empty() => Some(Self::All(all)),
            _ => None,
        }
    }
}

/// A failing build that is not a test-suite build.
#[derive(Debug, Clone)]
pub struct PlainBuild<'a> {
    pub key: BuildKey,
    pub build: &'a BuildRecord,
}

/// A failing test-suite build and what the report shows for it.
#[derive(Debug, Clone)]
pub struct TestSuiteBuild<'a> {
    pub key: BuildKey,
    pub build: &'a BuildRecord,
    /// Set for list/aggregator builds: no rerun, Java version or test lines
    pub suppressed: bool,
    pub rerun: Option<RerunGuidance<'a>>,
    pub java_version: Option<&'a str>,
    /// FAILED tests in record order; empty when suppressed
    pub failed_tests: Vec<&'a TestRecord>,
}

/// Partition of the child builds.
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    pub test_suite_builds: Vec<TestSuiteBuild<'a>>,
    pub plain_builds: Vec<PlainBuild<'a>>,
}

impl Classification<'_> {
    pub fn len(&self) -> usize {
        self.test_suite_builds.len() + self.plain_builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of history lookups the report needs.
    pub fn failed_test_count(&self) -> usize {
        self.test_suite_builds
            .iter()
            .map(|b| b.failed_tests.len())
            .sum()
    }
}

/// Split `builds` into test-suite builds and plain builds.
///
/// Each build is keyed by its position in `builds`, so duplicate names
/// stay distinct.
pub fn classify<'a>(builds: &'a [BuildRecord], rules: &ClassificationRules) -> Classification<'a> {
    let mut classification = Classification::default();

    for (index, build) in builds.iter().enumerate() {
        let key = BuildKey::new(&build.build_name, index);

        if !rules.is_test_suite(build) {
            classification.plain_builds.push(PlainBuild { key, build });
            continue;
        }

        let suppressed = rules.is_test_list(build);
        let (rerun, java_version, failed_tests) = if suppressed {
            (None, None, Vec::new())
        } else {
            (
                RerunGuidance::for_build(build),
                build.java_version.as_deref().filter(|v| !v.is_empty()),
                build.failed_tests().collect(),
            )
        };

        classification.test_suite_builds.push(TestSuiteBuild {
            key,
            build,
            suppressed,
            rerun,
            java_version,
            failed_tests,
        });
    }

    classification
}
