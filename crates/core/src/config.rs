//! Config file discovery and loading
//!
//! Values are layered in priority order:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (resolved by clap)
//! 3. Config file (searched in standard locations)
//! 4. Built-in defaults (lowest priority)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where the config file was found
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path given with `--config` or the config env var
    Explicit(PathBuf),
    /// `./weather-api.toml`
    CurrentDir(PathBuf),
    /// `$XDG_CONFIG_HOME/weather-api/` or `~/.config/weather-api/`
    XdgConfig(PathBuf),
    /// `/etc/weather-api/`
    System(PathBuf),
    /// Nothing found, built-in defaults apply
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Find the config file for `filename`.
///
/// An explicit path wins when it exists; otherwise the current directory,
/// the XDG config home and `/etc/weather-api/` are tried in that order.
pub fn find_config_file(explicit: Option<PathBuf>, filename: &str) -> ConfigSource {
    if let Some(path) = explicit.filter(|p| p.exists()) {
        return ConfigSource::Explicit(path);
    }

    let local = PathBuf::from(filename);
    if local.exists() {
        return ConfigSource::CurrentDir(local);
    }

    let xdg = xdg_config_path(filename);
    if xdg.exists() {
        return ConfigSource::XdgConfig(xdg);
    }

    let system = Path::new("/etc").join(APP_NAME).join(filename);
    if system.exists() {
        return ConfigSource::System(system);
    }

    ConfigSource::Defaults
}

fn xdg_config_path(filename: &str) -> PathBuf {
    let base = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|_| PathBuf::from(".config"));
    base.join(APP_NAME).join(filename)
}

/// Parse the TOML file behind `source`, or return `T::default()` when no
/// file was found.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    match source.path() {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(T::default()),
    }
}
