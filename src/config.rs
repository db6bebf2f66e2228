//! # Unified Application Configuration
//!
//! This module gathers every setting the recipe matcher needs into a single
//! structured configuration object. It supports loading from environment
//! variables (and a `.env` file), validation, and a redacted summary for logs.

use crate::errors::{error_logging, AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use crate::similarity::{DEFAULT_MATCH_THRESHOLD, DEFAULT_MIN_SIMILARITY};
use crate::validation::validate_similarity_threshold;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Upper bound for the configured search page size
pub const MAX_CONFIGURED_LIMIT: usize = 10_000;

/// Similarity matching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum score for an existing recipe to be reused (0-100)
    ///
    /// At 0 any named recipe is reused, even one scoring 0.
    pub match_threshold: f64,
    /// Minimum score for a recipe to appear in search results (0-100)
    pub min_similarity: f64,
    /// Default and maximum page size for search results
    pub search_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            search_limit: 20,
        }
    }
}

impl MatchingConfig {
    /// Validate matching configuration
    pub fn validate(&self) -> AppResult<()> {
        validate_similarity_threshold(self.match_threshold).map_err(|e| {
            AppError::Config(format!(
                "Match threshold {} is invalid ({}). Expected a value between 0 and 100",
                self.match_threshold, e
            ))
        })?;

        validate_similarity_threshold(self.min_similarity).map_err(|e| {
            AppError::Config(format!(
                "Minimum similarity {} is invalid ({}). Expected a value between 0 and 100",
                self.min_similarity, e
            ))
        })?;

        if self.search_limit == 0 {
            return Err(AppError::Config("Search limit cannot be 0".to_string()));
        }

        if self.search_limit > MAX_CONFIGURED_LIMIT {
            return Err(AppError::Config(format!(
                "Search limit cannot be greater than {}",
                MAX_CONFIGURED_LIMIT
            )));
        }

        Ok(())
    }
}

/// Database configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Minimum number of idle connections
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            connect_timeout_secs: 30,
            min_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::Config("Database URL cannot be empty".to_string()));
        }

        if !self.url.starts_with("postgresql://") && !self.url.starts_with("postgres://") {
            return Err(AppError::Config(
                "Database URL must start with 'postgresql://' or 'postgres://'".to_string(),
            ));
        }

        let connection_part = match self.url.split_once("://") {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => {
                return Err(AppError::Config(
                    "Database URL format is invalid".to_string(),
                ))
            }
        };

        if !connection_part.contains('@') {
            return Err(AppError::Config(
                "Database URL must contain authentication information".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(AppError::Config("Max connections cannot be 0".to_string()));
        }

        if self.max_connections > 100 {
            return Err(AppError::Config(
                "Max connections cannot be greater than 100".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(AppError::Config("Connect timeout cannot be 0".to_string()));
        }

        if self.connect_timeout_secs > 300 {
            return Err(AppError::Config(
                "Connect timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(AppError::Config(
                "Min connections cannot be greater than max connections".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Similarity matching configuration
    pub matching: MatchingConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

/// Log a configuration error and hand it back for propagation
fn logged(err: AppError, config_key: &str, operation: &str) -> AppError {
    error_logging::log_config_error(&err, config_key, operation);
    err
}

/// Read an optional variable, falling back to `default` when unset
fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            logged(
                AppError::Config(format!("{} must be a valid number", key)),
                key,
                "load_config",
            )
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_process_env()
    }

    /// Load configuration from the process environment only, without `.env`
    pub fn from_process_env() -> AppResult<Self> {
        let defaults = Self::default();
        let mut config = Self::default();

        // Matching configuration
        config.matching.match_threshold =
            env_or("RECIPE_MATCH_THRESHOLD", defaults.matching.match_threshold)?;
        config.matching.min_similarity =
            env_or("RECIPE_MIN_SIMILARITY", defaults.matching.min_similarity)?;
        config.matching.search_limit =
            env_or("RECIPE_SEARCH_LIMIT", defaults.matching.search_limit)?;

        // Database configuration
        config.database.url = env::var("DATABASE_URL").map_err(|_| {
            logged(
                AppError::Config("DATABASE_URL environment variable is required".to_string()),
                "DATABASE_URL",
                "load_config",
            )
        })?;
        config.database.max_connections =
            env_or("DATABASE_MAX_CONNECTIONS", defaults.database.max_connections)?;
        config.database.min_connections =
            env_or("DATABASE_MIN_CONNECTIONS", defaults.database.min_connections)?;
        config.database.connect_timeout_secs = env_or(
            "DATABASE_CONNECT_TIMEOUT_SECS",
            defaults.database.connect_timeout_secs,
        )?;

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.matching
            .validate()
            .map_err(|e| logged(e, "matching", "validate_config"))?;
        self.database
            .validate()
            .map_err(|e| logged(e, "database", "validate_config"))?;
        self.observability
            .validate()
            .map_err(|e| logged(AppError::Config(e), "observability", "validate_config"))?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: db_url=[REDACTED], match_threshold={}, min_similarity={}, search_limit={}, environment={}",
            self.matching.match_threshold,
            self.matching.min_similarity,
            self.matching.search_limit,
            self.observability.environment
        )
    }
}
