use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::{env, path::PathBuf, time::Duration};
use time::{format_description::well_known::Iso8601, OffsetDateTime};
use weather_api_core::{
    find_config_file, load_config, DatabaseConfig, DatabaseCredentials, ProviderConfig,
    SettingsError, DEFAULT_API_PORT, DEFAULT_POOL_SIZE,
};

pub const CONFIG_FILE_NAME: &str = "weather-api.toml";

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Weather API - stored locations and their weather history"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $WEATHER_API_CONFIG, ./weather-api.toml,
    /// $XDG_CONFIG_HOME/weather-api/weather-api.toml, /etc/weather-api/weather-api.toml
    #[arg(short, long, env = "WEATHER_API_CONFIG")]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "WEATHER_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "WEATHER_API_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WEATHER_API_PORT")]
    pub port: Option<String>,

    /// Complete database url, e.g. postgres://user:pw@host/db or sqlite://weather.db?mode=rwc
    /// Takes precedence over the separate credential settings
    #[arg(long, env = "WEATHER_API_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database user
    #[arg(long, env = "WEATHER_API_DB_USER")]
    pub db_user: Option<String>,

    /// Database name
    #[arg(long, env = "WEATHER_API_DB_DATABASE")]
    pub db_database: Option<String>,

    /// Database password
    #[arg(long, env = "WEATHER_API_DB_PASSWORD")]
    pub db_password: Option<String>,

    /// Database address as host:port
    #[arg(long, env = "WEATHER_API_DB_ADDRESS")]
    pub db_address: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "WEATHER_API_DB_POOL_SIZE")]
    pub db_pool_size: Option<u32>,

    /// Base url of the open weather map api
    #[arg(long, env = "WEATHER_API_PROVIDER_URL")]
    pub provider_url: Option<String>,

    /// Open weather map api key
    #[arg(long, env = "WEATHER_API_PROVIDER_TOKEN")]
    pub provider_token: Option<String>,

    /// Seconds to wait for the open weather map api
    #[arg(long, env = "WEATHER_API_PROVIDER_TIMEOUT")]
    pub provider_timeout: Option<u64>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn database_config(&self) -> Result<DatabaseConfig, SettingsError> {
        let config = match self.database_url.clone().filter(|url| !url.is_empty()) {
            Some(url) => DatabaseConfig::from_url(url),
            None => DatabaseConfig::from_credentials(&DatabaseCredentials {
                user: self.db_user.clone().unwrap_or_default(),
                database: self.db_database.clone().unwrap_or_default(),
                password: self.db_password.clone().unwrap_or_default(),
                address: self.db_address.clone().unwrap_or_default(),
            })?,
        };
        Ok(config.with_max_connections(self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)))
    }

    pub fn provider_config(&self) -> Result<ProviderConfig, SettingsError> {
        ProviderConfig::new(
            self.provider_url.clone(),
            self.provider_token.clone(),
            self.provider_timeout.map(Duration::from_secs),
        )
    }

    /// Values set on `self` win over the ones read from the config file.
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            domain: self.domain.or(file_config.domain),
            port: self.port.or(file_config.port),
            database_url: self.database_url.or(file_config.database_url),
            db_user: self.db_user.or(file_config.db_user),
            db_database: self.db_database.or(file_config.db_database),
            db_password: self.db_password.or(file_config.db_password),
            db_address: self.db_address.or(file_config.db_address),
            db_pool_size: self.db_pool_size.or(file_config.db_pool_size),
            provider_url: self.provider_url.or(file_config.provider_url),
            provider_token: self.provider_token.or(file_config.provider_token),
            provider_timeout: self.provider_timeout.or(file_config.provider_timeout),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> anyhow::Result<Cli> {
    let cli_args = Cli::parse();

    let source = find_config_file(cli_args.config.as_ref().map(PathBuf::from), CONFIG_FILE_NAME);
    if let Some(path) = source.path() {
        log::info!("Loading config from: {}", path.display());
    }

    let file_config: Cli = load_config(&source)?;

    // env vars are already folded into cli_args by clap
    Ok(cli_args.merge(file_config))
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
