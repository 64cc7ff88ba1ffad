use log::{error, info};
use std::sync::Arc;
use time::OffsetDateTime;

use super::provider_failure;
use crate::{
    db::{LocationStore, NewReading, Statistics, StoreError, WeatherReading, WeatherStore},
    error::Error,
    provider::{CurrentWeather, ProviderQuery, WeatherProvider},
};

/// Fetches current conditions for stored locations and records them.
pub struct WeatherIngestion {
    provider: Arc<dyn WeatherProvider>,
    locations: Arc<dyn LocationStore>,
    readings: Arc<dyn WeatherStore>,
}

impl WeatherIngestion {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        locations: Arc<dyn LocationStore>,
        readings: Arc<dyn WeatherStore>,
    ) -> Self {
        Self {
            provider,
            locations,
            readings,
        }
    }

    pub async fn ingest(&self, location_id: i64) -> Result<WeatherReading, Error> {
        self.locations
            .get(location_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => Error::location_not_found(location_id),
                e => {
                    error!("error getting location {}: {}", location_id, e);
                    Error::unavailable()
                }
            })?;

        let query = ProviderQuery::Id(location_id);
        let payload = self
            .provider
            .fetch(&query)
            .await
            .map_err(|e| provider_failure(e, &query))?;

        let reading = self
            .readings
            .save_reading(new_reading(location_id, payload))
            .await
            .map_err(|e| {
                error!("error saving weather for location {}: {}", location_id, e);
                Error::unavailable()
            })?;
        info!(
            "stored reading {} for location {}",
            reading.id, reading.location_id
        );

        Ok(reading)
    }
}

fn new_reading(location_id: i64, payload: CurrentWeather) -> NewReading {
    let observed_at = Some(payload.dt)
        .filter(|dt| *dt > 0)
        .and_then(|dt| OffsetDateTime::from_unix_timestamp(dt).ok())
        .unwrap_or_else(OffsetDateTime::now_utc);

    NewReading {
        location_id,
        observed_at,
        temperature: payload.main.temp,
        temp_min: payload.main.temp_min,
        temp_max: payload.main.temp_max,
        // entries without a `main` label describe nothing to record
        conditions: payload
            .weather
            .into_iter()
            .map(|w| w.main.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect(),
    }
}

/// Derived statistics over a location's stored history.
pub struct StatisticsAggregator {
    locations: Arc<dyn LocationStore>,
    readings: Arc<dyn WeatherStore>,
}

impl StatisticsAggregator {
    pub fn new(locations: Arc<dyn LocationStore>, readings: Arc<dyn WeatherStore>) -> Self {
        Self {
            locations,
            readings,
        }
    }

    pub async fn statistics(&self, location_id: i64) -> Result<Statistics, Error> {
        let missing_or_unavailable = |e: StoreError| match e {
            StoreError::NotFound => Error::location_does_not_exist(location_id),
            e => {
                error!(
                    "error building statistics for location {}: {}",
                    location_id, e
                );
                Error::unavailable()
            }
        };

        self.locations
            .get(location_id)
            .await
            .map_err(missing_or_unavailable)?;
        self.readings
            .statistics(location_id)
            .await
            .map_err(missing_or_unavailable)
    }
}
