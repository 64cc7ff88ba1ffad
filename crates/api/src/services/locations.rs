use log::{error, info};
use std::sync::Arc;

use super::provider_failure;
use crate::{
    db::{Location, LocationStore, StoreError},
    error::{Error, CITY_NAME_REQUIRED},
    provider::{ProviderQuery, WeatherProvider},
};

/// Resolves locations through the provider and keeps them in storage.
pub struct LocationOrchestrator {
    provider: Arc<dyn WeatherProvider>,
    locations: Arc<dyn LocationStore>,
}

impl LocationOrchestrator {
    pub fn new(provider: Arc<dyn WeatherProvider>, locations: Arc<dyn LocationStore>) -> Self {
        Self {
            provider,
            locations,
        }
    }

    /// Looks the city up at the provider and stores it under the provider's
    /// identifier. An already stored identifier is never overwritten.
    pub async fn create_location(
        &self,
        city_name: &str,
        country_code: Option<&str>,
    ) -> Result<Location, Error> {
        let city_name = city_name.trim();
        if city_name.is_empty() {
            return Err(Error::InvalidInput(CITY_NAME_REQUIRED.to_string()));
        }

        let query = ProviderQuery::city(city_name, country_code);
        let payload = self
            .provider
            .fetch(&query)
            .await
            .map_err(|e| provider_failure(e, &query))?;

        let location = Location {
            location_id: payload.id,
            city_name: payload.name,
            country_code: payload.sys.country,
            latitude: payload.coord.lat,
            longitude: payload.coord.lon,
        };

        match self.locations.get(location.location_id).await {
            Ok(_) => {
                info!(
                    "location '{}' already stored as {}",
                    query, location.location_id
                );
                return Err(Error::location_exists(&query));
            }
            Err(StoreError::NotFound) => {}
            Err(e) => {
                error!(
                    "error looking up location {}: {}",
                    location.location_id, e
                );
                return Err(Error::unavailable());
            }
        }

        match self.locations.save(location.clone()).await {
            Ok(()) => {
                info!(
                    "created location {} ({}, {})",
                    location.location_id, location.city_name, location.country_code
                );
                Ok(location)
            }
            Err(StoreError::Conflict(detail)) => {
                info!("location '{}' was created concurrently: {}", query, detail);
                Err(Error::location_exists(&query))
            }
            Err(e) => {
                error!("error saving location {}: {}", location.location_id, e);
                Err(Error::unavailable())
            }
        }
    }

    pub async fn get_location(&self, location_id: i64) -> Result<Location, Error> {
        self.locations
            .get(location_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => Error::location_not_found(location_id),
                e => {
                    error!("error getting location {}: {}", location_id, e);
                    Error::unavailable()
                }
            })
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, Error> {
        self.locations.list().await.map_err(|e| {
            error!("error listing locations: {}", e);
            Error::unavailable()
        })
    }

    /// Removes the location together with its weather history.
    pub async fn delete_location(&self, location_id: i64) -> Result<(), Error> {
        self.locations
            .delete(location_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => Error::location_does_not_exist(location_id),
                e => {
                    error!("error deleting location {}: {}", location_id, e);
                    Error::Unavailable(format!("can not delete location '{}'", location_id))
                }
            })?;
        info!("deleted location {}", location_id);
        Ok(())
    }
}
