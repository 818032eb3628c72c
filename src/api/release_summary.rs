//! Release summary report endpoint.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::services::ReportAssembler;

/// Content type of the generated report.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Query parameters for the release summary endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummaryQuery {
    /// Id of the parent (pipeline) build
    pub parent_id: String,
}

/// Generate the release summary report for a parent build.
///
/// A parent id with no build record yields a one-line "cannot find" report
/// with status 200; only data service failures produce an error status.
#[utoipa::path(
    get,
    path = "/api/v1/release-summary",
    tag = "Release Summary",
    params(
        ("parentId" = String, Query, description = "Id of the parent build")
    ),
    responses(
        (status = 200, description = "Markdown release summary", body = String, content_type = "text/markdown"),
        (status = 400, description = "Missing or empty parent id", body = crate::error::ErrorResponse),
        (status = 502, description = "Data service failure", body = crate::error::ErrorResponse)
    )
)]
#[get("/release-summary")]
pub async fn release_summary(
    assembler: web::Data<ReportAssembler>,
    query: web::Query<ReleaseSummaryQuery>,
) -> AppResult<HttpResponse> {
    let parent_id = query.parent_id.trim();
    if parent_id.is_empty() {
        return Err(AppError::InvalidInput(
            "parentId must not be empty".to_string(),
        ));
    }

    let report = assembler.generate_release_summary(parent_id).await?;
    info!(
        parent_id = %parent_id,
        bytes = report.len(),
        "Generated release summary"
    );

    Ok(HttpResponse::Ok()
        .content_type(MARKDOWN_CONTENT_TYPE)
        .body(report))
}

/// Configure release summary routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(release_summary);
}
