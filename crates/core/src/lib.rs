//! Weather API Core Library
//!
//! Configuration shared by the service binary and its tests:
//! - Config file discovery (XDG-compliant)
//! - Typed database and provider settings

mod config;
mod settings;

use std::time::Duration;

pub use config::{find_config_file, load_config, ConfigSource};
pub use settings::{DatabaseConfig, DatabaseCredentials, ProviderConfig, SettingsError};

/// Application name used for config paths
pub const APP_NAME: &str = "weather-api";

/// Default HTTP port
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default OpenWeatherMap endpoint
pub const DEFAULT_PROVIDER_URL: &str = "http://api.openweathermap.org/data/2.5";

/// Deadline for a single round-trip to the weather provider
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(4);

/// Default size of the database connection pool
pub const DEFAULT_POOL_SIZE: u32 = 5;
