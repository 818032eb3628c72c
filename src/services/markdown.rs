//! Markdown fragments and final rendering of the release summary.
//!
//! The text produced here is parsed and diffed by downstream tooling, so
//! every separator and trailing space is part of the format.

use chrono::{DateTime, Utc};

use crate::models::{BuildRecord, BuildResult, HistoryTally, ReportModel, TestRecord};
use crate::services::classifier::RerunGuidance;
use crate::services::links::ReportLinks;

const NL: &str = "\n";

/// Horizontal rule between report sections.
pub const SECTION_SEPARATOR: &str = "\n --- \n";

/// Emitted in place of the failure sections when nothing failed.
pub const NO_FAILURES: &str = "Congratulation! There is no failure!";

/// Report for a parent build id with no record.
pub fn not_found(parent_id: &str) -> String {
    format!("Cannot find the build information ({}) in Database!", parent_id)
}

/// RFC 1123 timestamp, e.g. `Mon, 19 Oct 2026 08:30:00 GMT`.
fn format_generated_at(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build start time as `10/19/2026, 8:30:00 AM` (UTC).
fn format_started_at(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

/// Header block for the parent build (without the trailing separator).
pub fn header(
    parent: &BuildRecord,
    parent_id: &str,
    links: &ReportLinks,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "#### Release Summary Report for {name} {NL}\
         **Report generated at:** {generated} {NL} {NL}\
         TRSS [Build]({build_detail}) and TRSS [Grid View]({grid_view}) {NL}\
         Jenkins Build URL {url} {NL}\
         Started by {started_by} at {started_at} {NL}",
        name = parent.build_name,
        generated = format_generated_at(generated_at),
        build_detail = links.build_detail(parent_id),
        grid_view = links.grid_view(parent_id),
        url = parent.build_url,
        started_by = parent.start_by.as_deref().unwrap_or("unknown"),
        started_at = format_started_at(parent.timestamp),
    )
}

/// ` ⚠️ UNSTABLE ⚠️` for unstable builds, ` ❌ <RESULT> ❌` for anything else.
pub fn status_line(result: &BuildResult) -> String {
    match result {
        BuildResult::Unstable => format!(" ⚠️ {} ⚠️{NL}", result),
        _ => format!(" ❌ {} ❌{NL}", result),
    }
}

/// Linked build name followed by its status line.
pub fn build_heading(build: &BuildRecord) -> String {
    format!(
        "{NL}[**{}**]({}){}",
        build.build_name,
        build.build_url,
        status_line(&build.build_result)
    )
}

pub fn rerun_line(rerun: &RerunGuidance<'_>) -> String {
    match rerun {
        RerunGuidance::Failed(link) => format!("Rerun [failed]({}){NL}", link),
        RerunGuidance::All(link) => format!("Rerun [all]({}){NL}", link),
    }
}

/// Collapsible `java -version` block.
pub fn java_version_block(java_version: &str) -> String {
    format!(
        "<details><summary>java -version</summary>{NL}{NL}```{NL}{}{NL}```{NL}</details>{NL}{NL}",
        java_version
    )
}

/// One line per failed test: output link, deep history ratio, possible issues.
///
/// `None` history renders as unknown when a failed lookup was tolerated.
pub fn failed_test_line(
    links: &ReportLinks,
    build: &BuildRecord,
    test: &TestRecord,
    history: Option<HistoryTally>,
) -> String {
    let deep_history = match history {
        Some(tally) => format!("deep history {} passed", tally),
        None => "deep history unknown".to_string(),
    };

    format!(
        "[{name}]({output}) => [{deep_history}]({history_link}) | [possible issues]({issues}){NL}",
        name = test.test_name,
        output = links.test_output(&test.id),
        history_link = links.deep_history(&test.id),
        issues = links.possible_issues(&build.id, &build.build_name, &test.id, &test.test_name),
    )
}

/// Serialize a fully aggregated report model.
///
/// Buckets are walked in key order, which is ascending build name.
pub fn render(model: &ReportModel) -> String {
    let summary = match model {
        ReportModel::NotFound { parent_id } => return not_found(parent_id),
        ReportModel::Summary(summary) => summary,
    };

    let mut report = String::with_capacity(summary.header.len() + 256);
    report.push_str(&summary.header);
    report.push_str(SECTION_SEPARATOR);

    if !summary.has_failures {
        report.push_str(NO_FAILURES);
        return report;
    }

    let buckets = &summary.build_buckets;
    for fragment in buckets.failed_build_summary.values() {
        report.push_str(fragment);
    }
    report.push_str(SECTION_SEPARATOR);
    for fragment in buckets.failed_test_summary.values() {
        report.push_str(fragment);
    }

    report
}
