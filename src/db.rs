//! # Recipe Store
//!
//! Postgres access for the recipes that dish lookups and searches are matched
//! against. Similarity is computed in Rust over the loaded candidates; the
//! database only stores and lists recipes.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::errors::error_logging;
use crate::matcher::{LookupDecision, RecipeMatcher, SearchPage, SearchRequest};
use crate::observability;
use crate::similarity::{name_length_bounds, Named};
use crate::validation::validate_recipe_name;

/// Represents a recipe in the database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Named for Recipe {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Recipe {
    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: row.get("created_at"),
        }
    }
}

/// Create a connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await
        .context("Failed to connect to recipe database")?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipes (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255),
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipes table")?;

    info!("Database schema initialized");
    Ok(())
}

/// Insert a recipe and return its id
///
/// A provided name is trimmed and must pass [`validate_recipe_name`].
pub async fn create_recipe(
    pool: &PgPool,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<i64> {
    let name = match name {
        Some(raw) => Some(validate_recipe_name(raw).map_err(|reason| {
            error_logging::log_validation_error(&reason, "create_recipe", "recipe_name", Some(raw));
            anyhow::anyhow!("Invalid recipe name: {}", reason)
        })?),
        None => None,
    };

    let start = Instant::now();
    let result = sqlx::query(
        "INSERT INTO recipes (name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await;
    observability::record_db_operation("create_recipe", result.is_ok(), start.elapsed());

    let row = result.context("Failed to insert recipe")?;
    let recipe_id: i64 = row.get(0);

    debug!(recipe_id, recipe_name = ?name, "Recipe created");
    Ok(recipe_id)
}

/// Read a recipe by id
pub async fn read_recipe(pool: &PgPool, recipe_id: i64) -> Result<Option<Recipe>> {
    let start = Instant::now();
    let result = sqlx::query(
        "SELECT id, name, description, created_at FROM recipes WHERE id = $1",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await;
    observability::record_db_operation("read_recipe", result.is_ok(), start.elapsed());

    let row = result.context("Failed to read recipe")?;
    Ok(row.as_ref().map(Recipe::from_row))
}

/// Delete a recipe, returning whether a row was removed
pub async fn delete_recipe(pool: &PgPool, recipe_id: i64) -> Result<bool> {
    let start = Instant::now();
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await;
    observability::record_db_operation("delete_recipe", result.is_ok(), start.elapsed());

    let result = result.context("Failed to delete recipe")?;
    Ok(result.rows_affected() > 0)
}

/// Load every recipe whose name length lets it reach `min_similarity`
/// against `search_term`, oldest first
///
/// There is no row cap: the length window from [`name_length_bounds`] is the
/// only pre-filter, so newly stored recipes stay matchable however large the
/// table grows. Ordering by id makes the earliest stored recipe win ties.
pub async fn list_recipe_candidates(
    pool: &PgPool,
    search_term: &str,
    min_similarity: f64,
) -> Result<Vec<Recipe>> {
    let (min_len, max_len) = name_length_bounds(search_term, min_similarity);

    let start = Instant::now();
    let result = match max_len {
        // No minimum score: every recipe is a candidate, unnamed ones included
        None => {
            sqlx::query("SELECT id, name, description, created_at FROM recipes ORDER BY id ASC")
                .fetch_all(pool)
                .await
        }
        Some(max_len) => {
            sqlx::query(
                r#"SELECT id, name, description, created_at FROM recipes
                WHERE char_length(lower(regexp_replace(name, '^\s+|\s+$', '', 'g'))) BETWEEN $1 AND $2
                ORDER BY id ASC"#,
            )
            .bind(i64::try_from(min_len).unwrap_or(i64::MAX))
            .bind(i64::try_from(max_len).unwrap_or(i64::MAX))
            .fetch_all(pool)
            .await
        }
    };
    observability::record_db_operation("list_recipe_candidates", result.is_ok(), start.elapsed());

    let rows = match result {
        Ok(rows) => rows,
        Err(e) => {
            let window = format!("{}..={:?}", min_len, max_len);
            let context: [(&str, &dyn std::fmt::Display); 1] = [("name_length", &window)];
            error_logging::log_database_error(
                &e,
                "list_recipe_candidates",
                None,
                Some(&context[..]),
            );
            return Err(e).context("Failed to list recipe candidates");
        }
    };

    debug!(
        candidates = rows.len(),
        min_len,
        max_len = ?max_len,
        "Recipe candidates loaded"
    );
    Ok(rows.iter().map(Recipe::from_row).collect())
}

/// Look for a stored recipe similar enough to `dish_name` to be reused
pub async fn find_reusable_recipe(
    pool: &PgPool,
    matcher: &RecipeMatcher,
    dish_name: &str,
) -> Result<LookupDecision<Recipe>> {
    let candidates =
        list_recipe_candidates(pool, dish_name, matcher.config().match_threshold).await?;
    let decision = matcher.find_existing(dish_name, &candidates).cloned();

    if let LookupDecision::Reuse(m) = &decision {
        info!(
            dish_name = %dish_name,
            recipe_id = m.record.id,
            similarity = m.similarity,
            "Reusing existing recipe"
        );
    }

    Ok(decision)
}

/// Search stored recipes by name similarity
pub async fn search_recipes(
    pool: &PgPool,
    matcher: &RecipeMatcher,
    term: &str,
    request: SearchRequest,
) -> Result<SearchPage<Recipe>> {
    let candidates = list_recipe_candidates(pool, term, matcher.config().min_similarity).await?;
    Ok(matcher.search(term, &candidates, request).cloned())
}
