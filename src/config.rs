//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::services::assembler::{
    AssemblerSettings, DEFAULT_MAX_CONCURRENT_FETCHES, HistoryFailurePolicy,
};
use crate::services::classifier::{ClassificationRules, TEST_BUILD_PREFIX, TEST_LIST_MARKER};
use crate::services::history::DEFAULT_HISTORY_LIMIT;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    /// TRSS data API (the Express backend)
    pub const DEV_API_URL: &str = "http://localhost:3001";
    /// TRSS web UI origin used for links inside reports
    pub const DEV_PUBLIC_URL: &str = "http://localhost:3000";
    pub const DEV_HTTP_TIMEOUT_SECS: u64 = 10;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Base URL of the TRSS data API
    pub api_url: String,
    /// Public TRSS origin used to build report links
    pub public_url: String,
    /// Per-request timeout for data API calls
    pub http_timeout_secs: u64,
    /// Size of each test's deep-history window (default: 100)
    pub history_limit: usize,
    /// History lookups in flight per report (default: 16)
    pub max_concurrent_fetches: usize,
    /// Abort or degrade when one history lookup fails
    pub history_failure_policy: HistoryFailurePolicy,
    /// Build naming conventions
    pub classification: ClassificationRules,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a
    /// default. In production mode the data API and public URLs must be set
    /// to something other than the development defaults.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `TRSS_HOST`: Server host (default: 127.0.0.1)
    /// - `TRSS_PORT`: Server port (default: 8080)
    /// - `TRSS_API_URL`: TRSS data API base URL
    /// - `TRSS_PUBLIC_URL`: TRSS web UI origin used in report links
    /// - `TRSS_HTTP_TIMEOUT_SECS`: Data API request timeout (default: 10)
    /// - `TRSS_HISTORY_LIMIT`: Deep-history window size (default: 100)
    /// - `TRSS_MAX_CONCURRENT_FETCHES`: History lookups in flight (default: 16)
    /// - `TRSS_DEGRADE_HISTORY`: Render unknown history instead of failing (default: false)
    /// - `TRSS_TEST_BUILD_PREFIX`: Test-suite build name prefix (default: Test_openjdk)
    /// - `TRSS_TEST_LIST_MARKER`: List build name marker (default: _testList)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("TRSS_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("TRSS_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("TRSS_PORT must be a valid port number"))?;

        let api_url =
            env::var("TRSS_API_URL").unwrap_or_else(|_| defaults::DEV_API_URL.to_string());

        let public_url =
            env::var("TRSS_PUBLIC_URL").unwrap_or_else(|_| defaults::DEV_PUBLIC_URL.to_string());

        let http_timeout_secs = env::var("TRSS_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::DEV_HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("TRSS_HTTP_TIMEOUT_SECS must be a valid number")
            })?;

        let history_limit = env::var("TRSS_HISTORY_LIMIT")
            .unwrap_or_else(|_| DEFAULT_HISTORY_LIMIT.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("TRSS_HISTORY_LIMIT must be a valid number"))?;

        let max_concurrent_fetches = env::var("TRSS_MAX_CONCURRENT_FETCHES")
            .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENT_FETCHES.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue("TRSS_MAX_CONCURRENT_FETCHES must be a valid number")
            })?;

        let history_failure_policy = match env::var("TRSS_DEGRADE_HISTORY") {
            Ok(value) => {
                if parse_bool(&value).ok_or(ConfigError::InvalidValue(
                    "TRSS_DEGRADE_HISTORY must be true or false",
                ))? {
                    HistoryFailurePolicy::Degrade
                } else {
                    HistoryFailurePolicy::Abort
                }
            }
            Err(_) => HistoryFailurePolicy::Abort,
        };

        let classification = ClassificationRules {
            test_build_prefix: env::var("TRSS_TEST_BUILD_PREFIX")
                .unwrap_or_else(|_| TEST_BUILD_PREFIX.to_string()),
            test_list_marker: env::var("TRSS_TEST_LIST_MARKER")
                .unwrap_or_else(|_| TEST_LIST_MARKER.to_string()),
        };

        let config = Config {
            environment,
            host,
            port,
            api_url,
            public_url,
            http_timeout_secs,
            history_limit,
            max_concurrent_fetches,
            history_failure_policy,
            classification,
        };

        config.validate()?;

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Development configuration with every default applied.
    pub fn development() -> Self {
        Config {
            environment: Environment::Development,
            host: defaults::DEV_HOST.to_string(),
            port: defaults::DEV_PORT,
            api_url: defaults::DEV_API_URL.to_string(),
            public_url: defaults::DEV_PUBLIC_URL.to_string(),
            http_timeout_secs: defaults::DEV_HTTP_TIMEOUT_SECS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            history_failure_policy: HistoryFailurePolicy::Abort,
            classification: ClassificationRules::default(),
        }
    }

    /// Reject values the pipeline cannot work with, in any environment.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "TRSS_HISTORY_LIMIT must be greater than zero",
            ));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue(
                "TRSS_MAX_CONCURRENT_FETCHES must be greater than zero",
            ));
        }
        if self.classification.test_build_prefix.is_empty() {
            return Err(ConfigError::InvalidValue(
                "TRSS_TEST_BUILD_PREFIX must not be empty",
            ));
        }
        Ok(())
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.api_url == defaults::DEV_API_URL {
            errors.push(format!(
                "TRSS_API_URL is using development default '{}'. Set the production data API URL.",
                defaults::DEV_API_URL
            ));
        }

        if self.public_url == defaults::DEV_PUBLIC_URL {
            errors.push(format!(
                "TRSS_PUBLIC_URL is using development default '{}'. Reports would link to localhost.",
                defaults::DEV_PUBLIC_URL
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Pipeline settings derived from this configuration.
    pub fn assembler_settings(&self) -> AssemblerSettings {
        AssemblerSettings {
            history_limit: self.history_limit,
            max_concurrent_fetches: self.max_concurrent_fetches,
            history_failure_policy: self.history_failure_policy,
            rules: self.classification.clone(),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
