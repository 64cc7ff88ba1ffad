//! Typed settings handed to the service components at startup.

use std::time::Duration;

use url::Url;

use crate::{DEFAULT_POOL_SIZE, DEFAULT_PROVIDER_TIMEOUT, DEFAULT_PROVIDER_URL};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error(
        "database configuration is not provided, user=({user}), address=({address}), database=({database})"
    )]
    MissingDatabase {
        user: String,
        address: String,
        database: String,
    },
    #[error("invalid database address '{0}'")]
    InvalidDatabaseAddress(String),
    #[error("configuration for open weather map client is not provided")]
    MissingProviderToken,
    #[error("invalid provider url '{0}'")]
    InvalidProviderUrl(String),
    #[error("provider timeout must be greater than zero")]
    ZeroProviderTimeout,
}

/// Credentials for the relational store, as read from config or environment.
#[derive(Debug, Clone, Default)]
pub struct DatabaseCredentials {
    pub user: String,
    pub database: String,
    pub password: String,
    /// `host:port`
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_POOL_SIZE,
            acquire_timeout: Duration::from_secs(3),
        }
    }

    /// Assemble a PostgreSQL connection url. User, database and address are
    /// required; the password may be empty.
    pub fn from_credentials(credentials: &DatabaseCredentials) -> Result<Self, SettingsError> {
        let DatabaseCredentials {
            user,
            database,
            password,
            address,
        } = credentials;

        if user.is_empty() || database.is_empty() || address.is_empty() {
            return Err(SettingsError::MissingDatabase {
                user: user.clone(),
                address: address.clone(),
                database: database.clone(),
            });
        }

        let mut url = Url::parse(&format!("postgres://{}/{}", address, database))
            .map_err(|_| SettingsError::InvalidDatabaseAddress(address.clone()))?;
        url.set_username(user)
            .map_err(|_| SettingsError::InvalidDatabaseAddress(address.clone()))?;
        if !password.is_empty() {
            url.set_password(Some(password))
                .map_err(|_| SettingsError::InvalidDatabaseAddress(address.clone()))?;
        }

        Ok(Self::from_url(url.to_string()))
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(
        base_url: Option<String>,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, SettingsError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(SettingsError::MissingProviderToken)?;
        let base_url = base_url.unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string());
        Url::parse(&base_url).map_err(|_| SettingsError::InvalidProviderUrl(base_url.clone()))?;
        let timeout = timeout.unwrap_or(DEFAULT_PROVIDER_TIMEOUT);
        if timeout.is_zero() {
            return Err(SettingsError::ZeroProviderTimeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
        })
    }
}
