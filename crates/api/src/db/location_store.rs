use async_trait::async_trait;
use sqlx::{any::AnyRow, AnyPool, Row};

use super::{Location, StoreError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn get(&self, location_id: i64) -> Result<Location, StoreError>;
    /// All locations ordered by country code, then city name.
    async fn list(&self) -> Result<Vec<Location>, StoreError>;
    async fn save(&self, location: Location) -> Result<(), StoreError>;
    async fn delete(&self, location_id: i64) -> Result<(), StoreError>;
}

pub struct LocationAccess {
    pool: AnyPool,
}

impl LocationAccess {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

fn row_to_location(row: &AnyRow) -> Result<Location, sqlx::Error> {
    Ok(Location {
        location_id: row.try_get("location_id")?,
        city_name: row.try_get("city_name")?,
        country_code: row.try_get("country_code")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    })
}

#[async_trait]
impl LocationStore for LocationAccess {
    async fn get(&self, location_id: i64) -> Result<Location, StoreError> {
        let row = sqlx::query(
            "SELECT location_id, city_name, country_code, latitude, longitude
             FROM locations WHERE location_id = $1",
        )
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(row_to_location(&row)?)
    }

    async fn list(&self) -> Result<Vec<Location>, StoreError> {
        let rows = sqlx::query(
            "SELECT location_id, city_name, country_code, latitude, longitude
             FROM locations ORDER BY country_code ASC, city_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut locations = Vec::with_capacity(rows.len());
        for row in &rows {
            locations.push(row_to_location(row)?);
        }
        Ok(locations)
    }

    async fn save(&self, location: Location) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO locations (location_id, city_name, country_code, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(location.location_id)
        .bind(location.city_name)
        .bind(location.country_code)
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, location_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM locations WHERE location_id = $1")
            .bind(location_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
