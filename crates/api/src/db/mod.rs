mod database;
mod location_store;
mod statistics;
mod weather_store;

pub use database::*;
pub use location_store::*;
pub use statistics::*;
pub use weather_store::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Failures crossing the store boundary. Absence of a row is always
/// `NotFound`; everything the driver reports besides a uniqueness violation
/// is `Unavailable`.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no matching row")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    /// identifier of the location in open weather map service
    pub location_id: i64,
    /// name of the city
    pub city_name: String,
    /// country code
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A reading as assembled from the provider, before the store assigns ids.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub location_id: i64,
    pub observed_at: OffsetDateTime,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherReading {
    pub id: i64,
    pub location_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub observed_at: OffsetDateTime,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Condition {
    pub reading_id: i64,
    #[serde(rename = "type")]
    pub condition_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Statistics {
    pub count: i64,
    pub month_temperature: Vec<MonthTemperature>,
    /// date (`YYYY-MM-DD`) -> distinct condition types seen that day
    pub daily_condition: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthTemperature {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// `YYYY-MM`
    pub month: String,
}
