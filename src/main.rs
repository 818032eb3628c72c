//! TRSS Release Summary server - main entry point.
//!
//! Starts the Actix-web server exposing the release summary report.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use trss_release_summary_lib::api::{self, ApiDoc};
use trss_release_summary_lib::config::Config;
use trss_release_summary_lib::middleware::RequestLogger;
use trss_release_summary_lib::services::{
    HttpRecordFetcher, RecordFetcher, ReportAssembler, ReportLinks,
};

/// Perform health check (for Docker healthcheck).
async fn health_check() -> bool {
    let Ok(config) = Config::from_env() else {
        return false;
    };
    match HttpRecordFetcher::new(&config.api_url, config.http_timeout()) {
        Ok(fetcher) => fetcher.ping().await.is_ok(),
        Err(_) => false,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        if health_check().await {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, TRSS_API_URL and TRSS_PUBLIC_URL must be set");
            error!("  - Numeric limits must be positive integers");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  TRSS Release Summary");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for TRSS_API_URL and TRSS_PUBLIC_URL");
    }

    let fetcher = match HttpRecordFetcher::new(&config.api_url, config.http_timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to create data API client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fetcher.ping().await {
        warn!("TRSS data service not reachable yet: {}", e);
    }

    info!(
        "Data API: {} (history window {}, {} concurrent lookups, {:?} on history failure)",
        config.api_url,
        config.history_limit,
        config.max_concurrent_fetches,
        config.history_failure_policy
    );
    let links = ReportLinks::new(&config.public_url);
    let public_url = links.origin().to_string();
    info!("Report links point at {}", public_url);

    let assembler = ReportAssembler::new(Arc::new(fetcher), links, config.assembler_settings());
    let assembler = web::Data::new(assembler);

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let openapi = ApiDoc::openapi();

    // Start HTTP server
    let server = HttpServer::new(move || {
        // The TRSS web UI fetches reports cross-origin
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            Cors::default()
                .allowed_origin(&public_url)
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(assembler.clone())
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_release_summary_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
