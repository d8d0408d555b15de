use sqlx::migrate::MigrateDatabase;
use sqlx_migrator::{Migrate, Plan};

use crate::config::Config;

/// Create the database when missing and apply every pending migration
#[tracing::instrument(skip(config))]
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let url = &config.database.url;

    if !sqlx::Sqlite::database_exists(url).await? {
        tracing::info!("Database does not exist, creating: {url}");
        sqlx::Sqlite::create_database(url).await?;
    }

    let pool = crate::db::create_pool(url, 1).await?;
    let mut conn = pool.acquire().await?;
    bitebuddy_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

/// Drop the database if it exists, then migrate from scratch
#[tracing::instrument(skip(config))]
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    let url = &config.database.url;

    if sqlx::Sqlite::database_exists(url).await? {
        tracing::warn!("Dropping existing database: {url}");
        sqlx::Sqlite::drop_database(url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await
}
