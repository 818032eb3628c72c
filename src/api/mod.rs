//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod release_summary;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use release_summary::configure_routes as configure_release_summary_routes;
