use crate::shared::config::DatabaseConfig;
use crate::shared::error::AppError;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub type DbPool = Pool<Sqlite>;

pub struct Database;

impl Database {
    pub async fn initialize(config: &DatabaseConfig) -> Result<DbPool, AppError> {
        // Make sure the database directory exists before sqlite opens it.
        if let Some(path) = config.url.strip_prefix("sqlite:") {
            let file = path.split('?').next().unwrap_or(path);
            if let Some(parent) = Path::new(file).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Database connected: {}", config.url);

        Self::run_migrations(&pool).await?;

        Ok(pool)
    }

    pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations completed");
        Ok(())
    }
}
