//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TRSS Release Summary",
        version = "0.1.0",
        description = "Generates markdown release summary reports for TRSS parent builds"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Report endpoints
        api::release_summary::release_summary,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            api::health::ReadyResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Release Summary", description = "Release summary report generation")
    )
)]
pub struct ApiDoc;
