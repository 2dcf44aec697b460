use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates a PostgreSQL connection pool
///
/// Establishes a bounded pool of database connections for efficient reuse.
/// A request awaiting a connection parks until one frees up, so pool
/// exhaustion shows up as latency rather than failure.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Liveness probe issued once at startup
///
/// The process exits with a nonzero status when this fails, so a misconfigured
/// database surfaces immediately instead of on the first request.
pub async fn probe(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Database connectivity probe failed: {}", e))?;
    Ok(())
}
