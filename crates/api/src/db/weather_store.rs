use async_trait::async_trait;
use log::debug;
use sqlx::{AnyPool, Row};
use time::OffsetDateTime;

use super::{
    summarize, Condition, ConditionSample, NewReading, ReadingSample, Statistics, StoreError,
    WeatherReading,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherStore: Send + Sync {
    /// Writes the reading and all of its conditions in one transaction.
    async fn save_reading(&self, reading: NewReading) -> Result<WeatherReading, StoreError>;
    async fn statistics(&self, location_id: i64) -> Result<Statistics, StoreError>;
}

pub struct WeatherAccess {
    pool: AnyPool,
}

impl WeatherAccess {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WeatherStore for WeatherAccess {
    async fn save_reading(&self, reading: NewReading) -> Result<WeatherReading, StoreError> {
        // dropping the transaction on an early return rolls it back
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO weather_readings
             (location_id, observed_at, temperature, temp_min, temp_max)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(reading.location_id)
        .bind(reading.observed_at.unix_timestamp())
        .bind(reading.temperature)
        .bind(reading.temp_min)
        .bind(reading.temp_max)
        .fetch_one(&mut *tx)
        .await?;
        let reading_id: i64 = row.try_get("id")?;

        let mut conditions = Vec::with_capacity(reading.conditions.len());
        for condition_type in reading.conditions {
            sqlx::query("INSERT INTO conditions (reading_id, condition_type) VALUES ($1, $2)")
                .bind(reading_id)
                .bind(&condition_type)
                .execute(&mut *tx)
                .await?;
            conditions.push(Condition {
                reading_id,
                condition_type,
            });
        }

        tx.commit().await?;
        debug!(
            "saved reading {} for location {} with {} conditions",
            reading_id,
            reading.location_id,
            conditions.len()
        );

        Ok(WeatherReading {
            id: reading_id,
            location_id: reading.location_id,
            observed_at: reading.observed_at,
            temperature: reading.temperature,
            temp_min: reading.temp_min,
            temp_max: reading.temp_max,
            conditions,
        })
    }

    async fn statistics(&self, location_id: i64) -> Result<Statistics, StoreError> {
        // one transaction so the count and the rows describe the same history
        let mut tx = self.pool.begin().await?;

        let count: i64 =
            sqlx::query("SELECT COUNT(*) AS total FROM weather_readings WHERE location_id = $1")
                .bind(location_id)
                .fetch_one(&mut *tx)
                .await?
                .try_get("total")?;

        let reading_rows = sqlx::query(
            "SELECT id, observed_at, temperature, temp_min, temp_max
             FROM weather_readings
             WHERE location_id = $1
             ORDER BY observed_at ASC, id ASC",
        )
        .bind(location_id)
        .fetch_all(&mut *tx)
        .await?;

        let condition_rows = sqlx::query(
            "SELECT c.reading_id, c.condition_type
             FROM conditions AS c
             JOIN weather_readings AS w ON w.id = c.reading_id
             WHERE w.location_id = $1
             ORDER BY w.observed_at ASC, w.id ASC, c.id ASC",
        )
        .bind(location_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut readings = Vec::with_capacity(reading_rows.len());
        for row in &reading_rows {
            let observed_at: i64 = row.try_get("observed_at")?;
            readings.push(ReadingSample {
                id: row.try_get("id")?,
                observed_at: OffsetDateTime::from_unix_timestamp(observed_at)
                    .map_err(|e| StoreError::Unavailable(format!("invalid observed_at: {}", e)))?,
                temperature: row.try_get("temperature")?,
                temp_min: row.try_get("temp_min")?,
                temp_max: row.try_get("temp_max")?,
            });
        }

        let mut conditions = Vec::with_capacity(condition_rows.len());
        for row in &condition_rows {
            conditions.push(ConditionSample {
                reading_id: row.try_get("reading_id")?,
                condition_type: row.try_get("condition_type")?,
            });
        }

        Ok(summarize(count, &readings, &conditions))
    }
}
