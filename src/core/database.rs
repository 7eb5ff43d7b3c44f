use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Create the PostgreSQL connection pool backing the category store
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        "Connected to {} (max_connections={})",
        redact_url(&config.url),
        config.max_connections
    );

    Ok(pool)
}

/// Strip credentials from a connection URL before it reaches the logs
fn redact_url(url: &str) -> &str {
    url.split('@').next_back().unwrap_or("***")
}
