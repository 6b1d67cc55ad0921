use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the index tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS match_results (
            request_id  UUID PRIMARY KEY,
            "timestamp" TEXT NOT NULL,
            storage_key TEXT NOT NULL,
            bucket      TEXT NOT NULL,
            match_score TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS image_analysis_results (
            image_id      TEXT PRIMARY KEY,
            bucket        TEXT NOT NULL,
            uploaded_file TEXT NOT NULL,
            "timestamp"   TEXT NOT NULL,
            labels        JSONB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Index tables ready");
    Ok(())
}
