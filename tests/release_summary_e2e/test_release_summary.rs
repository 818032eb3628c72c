//! E2E tests: release summary over HTTP against a mock data API.

use trss_release_summary_lib::services::{AssemblerSettings, HistoryFailurePolicy};

use super::mock_trss_api::MockTrssApi;
use super::test_helpers::*;

/// (1) Failing children are rendered into both report sections.
#[actix_rt::test]
async fn test_release_summary_with_failures() {
    let mock = MockTrssApi::start(default_state()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;

    let (status, content_type, body) =
        get_release_summary(&app, &format!("parentId={}", PARENT_ID)).await;

    assert_eq!(status, 200, "Report should succeed: {}", body);
    assert!(content_type.starts_with("text/markdown"));
    assert!(body.starts_with("#### Release Summary Report for Pipeline_openjdk21 \n"));
    assert!(body.contains("Started by upstream project at 9/13/2020, 12:26:40 PM \n"));
    assert!(body.contains(&format!(
        "TRSS [Grid View]({}/resultSummary?parentId={}) \n",
        PUBLIC_URL, PARENT_ID
    )));

    let plain = format!(
        "\n[**{}**](https://ci.example.org/job/build/3/) ❌ FAILURE ❌\n",
        PLAIN_BUILD
    );
    let suite = format!(
        "\n[**{}**](https://ci.example.org/job/sanity/12/) ⚠️ UNSTABLE ⚠️\n\
         Rerun [failed](https://ci.example.org/job/sanity/rerunFailed)\n",
        TEST_SUITE_BUILD
    );
    let test_line = format!(
        "[jdk_math_0]({origin}/output/test?id=t1) => \
         [deep history 3/4 passed]({origin}/deepHistory?testId=t1) | \
         [possible issues]({origin}/possibleIssues?buildId=c1&buildName={build}&testId=t1&testName=jdk_math_0)\n",
        origin = PUBLIC_URL,
        build = TEST_SUITE_BUILD
    );

    let plain_at = body.find(&plain).expect("plain build fragment missing");
    let suite_at = body.find(&suite).expect("test suite fragment missing");
    assert!(plain_at < suite_at, "Plain builds come before test builds");
    assert!(body.contains(&test_line), "Missing test line in:\n{}", body);
    assert!(body.contains("<details><summary>java -version</summary>"));

    assert!(
        body.contains(&format!("\n[**{}**]() ❌  ❌\n", RUNNING_BUILD)),
        "Running build is listed with an empty status"
    );

    assert!(!body.contains("jdk_net_0"), "Passed tests are not listed");
    assert!(!body.contains(PASSING_BUILD), "Successful builds are not listed");
    assert!(!body.contains("There is no failure"));
}

/// (2) The data API is queried with the encoded result filter and limit.
#[actix_rt::test]
async fn test_release_summary_queries_data_api() {
    let mock = MockTrssApi::start(default_state()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;

    let (status, _, _) = get_release_summary(&app, &format!("parentId={}", PARENT_ID)).await;
    assert_eq!(status, 200);

    let requests = mock.requests();
    assert_eq!(
        requests,
        vec![
            format!("/api/getParents?id={}", PARENT_ID),
            format!(
                "/api/getAllChildBuilds?buildResult=%21SUCCESS&parentId={}",
                PARENT_ID
            ),
            "/api/getHistoryPerTest?testId=t1&limit=100".to_string(),
        ]
    );
}

/// (3) Custom history window is forwarded and bounds the tally.
#[actix_rt::test]
async fn test_release_summary_history_limit() {
    let mock = MockTrssApi::start(default_state()).await;
    let settings = AssemblerSettings {
        history_limit: 2,
        ..AssemblerSettings::default()
    };
    let app = create_test_app(&mock.api_url, settings).await;

    let (status, _, body) = get_release_summary(&app, &format!("parentId={}", PARENT_ID)).await;

    assert_eq!(status, 200);
    assert!(body.contains("[deep history 1/2 passed]"), "Body:\n{}", body);
    assert!(
        mock.requests()
            .contains(&"/api/getHistoryPerTest?testId=t1&limit=2".to_string())
    );
}

/// (4) A parent without failing children gets the congratulation line.
#[actix_rt::test]
async fn test_release_summary_no_failures() {
    let mock = MockTrssApi::start(default_state()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;

    let (status, _, body) =
        get_release_summary(&app, &format!("parentId={}", GREEN_PARENT_ID)).await;

    assert_eq!(status, 200);
    assert!(
        body.ends_with("\n --- \nCongratulation! There is no failure!"),
        "Body:\n{}",
        body
    );
    assert!(
        !mock
            .requests()
            .iter()
            .any(|r| r.starts_with("/api/getHistoryPerTest"))
    );
}

/// (5) Unknown parent renders the not-found sentence with status 200.
#[actix_rt::test]
async fn test_release_summary_unknown_parent() {
    let mock = MockTrssApi::start(default_state()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;

    let (status, _, body) = get_release_summary(&app, "parentId=nope").await;

    assert_eq!(status, 200);
    assert_eq!(body, "Cannot find the build information (nope) in Database!");
    assert_eq!(mock.requests().len(), 1, "No child query for a missing parent");
}

/// (6) Blank parent id is rejected before any upstream call.
#[actix_rt::test]
async fn test_release_summary_blank_parent_id() {
    let mock = MockTrssApi::start(default_state()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;

    let (status, _, body) = get_release_summary(&app, "parentId=%20%20").await;
    assert_eq!(status, 400, "Body: {}", body);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "INVALID_INPUT");

    let (status, _, _) = get_release_summary(&app, "").await;
    assert_eq!(status, 400, "Missing parentId is a bad request");

    assert!(mock.requests().is_empty());
}

/// (7) Upstream failure maps to 502 with no partial report.
#[actix_rt::test]
async fn test_release_summary_upstream_failure() {
    let mock = MockTrssApi::start(default_state().failing()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;

    let (status, content_type, body) =
        get_release_summary(&app, &format!("parentId={}", PARENT_ID)).await;

    assert_eq!(status, 502);
    assert!(content_type.starts_with("application/json"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "UPSTREAM_ERROR");
    assert!(!body.contains("Release Summary Report"));
}

/// (8) A broken history lookup aborts by default and degrades on request.
#[actix_rt::test]
async fn test_release_summary_broken_history() {
    let mock = MockTrssApi::start(default_state().with_broken_history("t1")).await;

    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;
    let (status, _, _) = get_release_summary(&app, &format!("parentId={}", PARENT_ID)).await;
    assert_eq!(status, 502);

    let settings = AssemblerSettings {
        history_failure_policy: HistoryFailurePolicy::Degrade,
        ..AssemblerSettings::default()
    };
    let app = create_test_app(&mock.api_url, settings).await;
    let (status, _, body) = get_release_summary(&app, &format!("parentId={}", PARENT_ID)).await;
    assert_eq!(status, 200);
    assert!(body.contains("=> [deep history unknown]("), "Body:\n{}", body);
}

/// (9) Readiness follows data API reachability, not its status codes.
#[actix_rt::test]
async fn test_ready_endpoint() {
    // The mock answers the empty-id readiness query with 400
    let mock = MockTrssApi::start(default_state()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;
    let req = actix_web::test::TestRequest::get()
        .uri("/api/v1/ready")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(mock.requests(), vec!["/api/getParents?id=".to_string()]);

    let mock = MockTrssApi::start(default_state().failing()).await;
    let app = create_test_app(&mock.api_url, AssemblerSettings::default()).await;
    let req = actix_web::test::TestRequest::get()
        .uri("/api/v1/ready")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let app = create_test_app("http://127.0.0.1:1", AssemblerSettings::default()).await;
    let req = actix_web::test::TestRequest::get()
        .uri("/api/v1/ready")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);
    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_READY");
}
