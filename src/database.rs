use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::store::{PgFilmStore, Result};

/// Postgres connection pool for the film catalog.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.url)
            .await?;
        info!("Database connected (pool size {})", config.pool_size);
        Ok(Database { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running catalog migrations...");
        sqlx::migrate!("./src/migrations").run(&self.pool).await?;
        info!("Catalog migrations completed");
        Ok(())
    }

    pub fn film_store(&self) -> PgFilmStore {
        PgFilmStore::new(self.pool.clone())
    }
}
