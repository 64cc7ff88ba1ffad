use anyhow::{Context, Result};
use log::info;
use sqlx::{
    any::{install_default_drivers, AnyPoolOptions},
    AnyPool,
};
use weather_api_core::DatabaseConfig;

const LOCATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS locations (
    location_id BIGINT PRIMARY KEY,
    city_name VARCHAR NOT NULL,
    country_code VARCHAR(10) NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    UNIQUE (city_name, country_code)
)";

const READINGS_TABLE: &str = "CREATE TABLE IF NOT EXISTS weather_readings (
    id {serial},
    location_id BIGINT NOT NULL REFERENCES locations (location_id) ON DELETE CASCADE,
    observed_at BIGINT NOT NULL,
    temperature DOUBLE PRECISION NOT NULL,
    temp_min DOUBLE PRECISION NOT NULL,
    temp_max DOUBLE PRECISION NOT NULL
)";

const READINGS_INDEX: &str = "CREATE INDEX IF NOT EXISTS weather_readings_location_idx
    ON weather_readings (location_id, observed_at)";

const CONDITIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS conditions (
    id {serial},
    reading_id BIGINT NOT NULL REFERENCES weather_readings (id) ON DELETE CASCADE,
    condition_type VARCHAR NOT NULL
)";

/// Owns the connection pool shared by the location and weather stores.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .context("Failed to create database connection pool")?;

        let db = Self { pool };
        db.create_schema(config.is_sqlite()).await?;
        info!("database initialized, pool size: {}", config.max_connections);

        Ok(db)
    }

    /// Creates the tables when they are missing. Only the auto-increment
    /// column type differs between the supported backends.
    async fn create_schema(&self, sqlite: bool) -> Result<()> {
        let serial = if sqlite {
            "INTEGER PRIMARY KEY AUTOINCREMENT"
        } else {
            "BIGSERIAL PRIMARY KEY"
        };

        let statements = [
            LOCATIONS_TABLE.to_string(),
            READINGS_TABLE.replace("{serial}", serial),
            READINGS_INDEX.to_string(),
            CONDITIONS_TABLE.replace("{serial}", serial),
        ];
        for statement in &statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to create database schema")?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database connectivity check failed")?;
        Ok(())
    }

    /// Waits for checked-out connections to be returned, then closes them.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// Fresh SQLite database in a temporary directory; the directory must
/// outlive the database.
#[cfg(test)]
pub(crate) async fn test_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("weather.db").display());
    let db = Database::connect(&DatabaseConfig::from_url(url)).await.unwrap();
    (dir, db)
}
