mod open_weather;

pub use open_weather::*;

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

/// Failures of a provider round-trip, in classification priority order.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProviderError {
    #[error("weather provider did not answer in time")]
    Timeout,
    #[error("weather provider has no match: {0}")]
    NotFound(String),
    #[error("weather provider request failed: {0}")]
    Upstream(String),
    #[error("weather provider sent a malformed payload: {0}")]
    MalformedPayload(String),
}

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderQuery {
    /// Provider-assigned location identifier (`id=`)
    Id(i64),
    /// Free-text `city[,country]` search (`q=`)
    City {
        name: String,
        country: Option<String>,
    },
}

impl ProviderQuery {
    pub fn city(name: &str, country: Option<&str>) -> Self {
        ProviderQuery::City {
            name: name.to_string(),
            country: country
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for ProviderQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderQuery::Id(id) => write!(f, "{}", id),
            ProviderQuery::City {
                name,
                country: Some(country),
            } => write!(f, "{},{}", name, country),
            ProviderQuery::City {
                name,
                country: None,
            } => write!(f, "{}", name),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Sync + Send {
    async fn fetch(&self, query: &ProviderQuery) -> Result<CurrentWeather, ProviderError>;
}

/// Current conditions as reported by the provider. Fields missing on the
/// wire fall back to zero or empty; see [`CurrentWeather::identified`] for
/// the ones a success body must carry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    pub id: i64,
    pub name: String,
    pub coord: Coordinates,
    pub weather: Vec<WeatherDescription>,
    pub main: MainReadings,
    pub sys: SystemInfo,
    /// observation time, unix seconds
    pub dt: i64,
}

impl CurrentWeather {
    /// A success body must name the location it describes; identifiers are
    /// only ever assigned by the provider.
    pub fn identified(self) -> Result<Self, ProviderError> {
        if self.id <= 0 {
            return Err(ProviderError::MalformedPayload(format!(
                "payload has no location id (id={})",
                self.id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(ProviderError::MalformedPayload(format!(
                "payload for location {} has no name",
                self.id
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherDescription {
    pub main: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MainReadings {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub country: String,
}
