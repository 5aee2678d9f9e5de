use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::infra::config::AppConfig;

pub async fn init_db(config: &AppConfig) -> anyhow::Result<PgPool> {
    anyhow::ensure!(!config.db.url.is_empty(), "`db.url` is required for the postgres driver");
    let pool = PgPoolOptions::new()
        .max_connections(config.db.max_connections as u32)
        .connect(config.db.url.as_str())
        .await
        .context("connect to database")?;
    info!("Connected to database!");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("run migrations")?;
    info!("Migrations applied");
    Ok(pool)
}
