use anyhow::Context;
use quake_ingest::config::{DEFAULT_DATABASE_URL, ENV_DATABASE_URL};
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let db_url = std::env::var(ENV_DATABASE_URL).unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let pool: Pool<Postgres> = PgPoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .context("failed to connect to the event store")?;

    // runs all pending migrations; no-op if up-to-date
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations applied");

    Ok(())
}
