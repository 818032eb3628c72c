//! CLI tool to print a release summary report.
//!
//! Usage:
//!   cargo run --bin generate-release-summary -- --parent-id 5f1a2b3c4d5e6f7a8b9c0d1e

use std::env;
use std::sync::Arc;

use trss_release_summary_lib::config::Config;
use trss_release_summary_lib::services::{HttpRecordFetcher, ReportAssembler, ReportLinks};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut parent_id: Option<String> = None;
    let mut api_url: Option<String> = None;
    let mut public_url: Option<String> = None;
    let mut history_limit: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--parent-id" | "-p" => {
                i += 1;
                if i < args.len() {
                    parent_id = Some(args[i].clone());
                }
            }
            "--api-url" | "-a" => {
                i += 1;
                if i < args.len() {
                    api_url = Some(args[i].clone());
                }
            }
            "--public-url" | "-u" => {
                i += 1;
                if i < args.len() {
                    public_url = Some(args[i].clone());
                }
            }
            "--history-limit" | "-l" => {
                i += 1;
                if i < args.len() {
                    history_limit = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // Validate required arguments
    let parent_id = match parent_id {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => {
            eprintln!("Error: --parent-id is required");
            print_usage();
            std::process::exit(1);
        }
    };

    // Without RUST_ENV the development defaults apply
    let mut config = if env::var("RUST_ENV").is_ok() {
        match Config::from_env() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::development()
    };

    if let Some(url) = api_url {
        config.api_url = url;
    }
    if let Some(url) = public_url {
        config.public_url = url;
    }
    if let Some(limit) = history_limit {
        config.history_limit = match limit.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                eprintln!(
                    "Error: Invalid history limit '{}'. Must be a positive number",
                    limit
                );
                std::process::exit(1);
            }
        };
    }

    let fetcher = match HttpRecordFetcher::new(&config.api_url, config.http_timeout()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error creating data API client: {}", e);
            std::process::exit(1);
        }
    };

    let assembler = ReportAssembler::new(
        Arc::new(fetcher),
        ReportLinks::new(&config.public_url),
        config.assembler_settings(),
    );

    match assembler.generate_release_summary(&parent_id).await {
        Ok(report) => println!("{}", report),
        Err(e) => {
            eprintln!("Error generating release summary: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!(
        "Usage: generate-release-summary --parent-id <id> [--api-url <url>] [--public-url <url>]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --parent-id, -p      Id of the parent build (required)");
    eprintln!("  --api-url, -a        TRSS data API base URL (default: TRSS_API_URL)");
    eprintln!("  --public-url, -u     TRSS web UI origin for report links (default: TRSS_PUBLIC_URL)");
    eprintln!("  --history-limit, -l  Deep-history window size (default: 100)");
    eprintln!("  --help, -h           Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  generate-release-summary --parent-id 5f1a2b3c4d5e6f7a8b9c0d1e");
    eprintln!(
        "  generate-release-summary -p 5f1a2b3c -a http://trss:3001 -u https://trss.adoptium.net"
    );
    eprintln!();
}
