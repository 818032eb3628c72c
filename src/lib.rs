//! TRSS release summary library.
//!
//! Aggregates a parent build's failing descendants and the deep history of
//! each failed test into a markdown release summary report, and serves it
//! over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
