//! Observability module for logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable level and format
//! - Prometheus metrics recorder installation
//! - Recording helpers for match lookups, searches and database calls

use std::time::Duration;

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize logging and metrics from environment configuration
///
/// Returns the Prometheus handle when metrics are enabled so the host server
/// can render it on its own endpoint.
pub fn init_observability() -> Result<Option<PrometheusHandle>> {
    init_observability_with_config(ObservabilityConfig::from_env())
}

/// Initialize logging and metrics with custom configuration
pub fn init_observability_with_config(
    config: ObservabilityConfig,
) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(&config)?;

    let handle = if config.enable_metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    tracing::info!(
        environment = %config.environment,
        metrics_enabled = %config.enable_metrics,
        "Observability stack initialized successfully"
    );
    Ok(handle)
}

/// Install the global tracing subscriber
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("recipe_matcher={}", config.log_level.to_lowercase()).parse()?)
        .add_directive("sqlx=warn".parse()?);

    if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder as the global metrics recorder
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics collection initialized");
    Ok(handle)
}

/// Record the outcome of a reuse-or-generate lookup
pub fn record_match_lookup(
    reused: bool,
    candidates: usize,
    similarity: Option<f64>,
    duration: Duration,
) {
    let outcome = if reused { "reuse" } else { "generate" };
    metrics::counter!("recipe_match_lookups_total", "outcome" => outcome).increment(1);
    metrics::histogram!("recipe_match_candidates").record(candidates as f64);
    metrics::histogram!("recipe_match_duration_seconds").record(duration.as_secs_f64());
    if let Some(similarity) = similarity {
        metrics::histogram!("recipe_match_similarity").record(similarity);
    }
}

/// Record a ranked search
pub fn record_search(candidates: usize, results: usize, duration: Duration) {
    metrics::counter!("recipe_search_requests_total").increment(1);
    metrics::histogram!("recipe_search_candidates").record(candidates as f64);
    metrics::histogram!("recipe_search_results").record(results as f64);
    metrics::histogram!("recipe_search_duration_seconds").record(duration.as_secs_f64());
}

/// Record a database call
pub fn record_db_operation(operation: &'static str, success: bool, duration: Duration) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("db_operations_total", "operation" => operation, "result" => result)
        .increment(1);
    metrics::histogram!("db_operation_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}
