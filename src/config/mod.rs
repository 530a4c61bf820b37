//! Application configuration.
//!
//! Settings are read from an optional TOML file, then overridden by environment
//! variables. A missing file is not an error; every setting has a default.

use crate::core::event::EventRules;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{env, path::Path, str::FromStr};
use tracing::{debug, info};

/// Database configuration and connection management
pub mod database;

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "EVENT_DESK_CONFIG";
/// Config file used when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Database used when neither the file nor `DATABASE_URL` names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://event_desk.sqlite?mode=rwc";

/// Runtime settings for the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SeaORM connection string
    pub database_url: String,
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Port the HTTP listener binds to
    pub port: u16,
    /// Reject event dates before today
    pub reject_past_event_dates: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            reject_past_event_dates: false,
        }
    }
}

impl AppConfig {
    /// Parses settings from TOML text. Absent keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config file: {e}"),
        })
    }

    /// Reads settings from `path`, falling back to defaults when the file does not exist.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(?path, "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read config file {}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(address) = lookup("BIND_ADDRESS") {
            self.bind_address = address;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_var("PORT", &port)?;
        }
        if let Some(flag) = lookup("REJECT_PAST_EVENT_DATES") {
            self.reject_past_event_dates = parse_var("REJECT_PAST_EVENT_DATES", &flag)?;
        }
        Ok(())
    }

    /// Rules applied to event writes.
    #[must_use]
    pub const fn event_rules(&self) -> EventRules {
        EventRules {
            reject_past_dates: self.reject_past_event_dates,
        }
    }

    /// The `address:port` pair the listener binds to.
    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::Config {
        message: format!("Invalid value for {name}: {value}"),
    })
}

/// Loads the application configuration from the config file and environment.
///
/// # Errors
/// Returns `Error::Config` if the file exists but cannot be read or parsed, or if an
/// environment override holds an invalid value.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = AppConfig::from_file(&path)?;
    config.apply_overrides(|name| env::var(name).ok())?;
    info!(
        config_path = %path,
        listen = %config.listen_address(),
        reject_past_event_dates = config.reject_past_event_dates,
        "Configuration loaded"
    );
    Ok(config)
}
