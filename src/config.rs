//! Service configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.

use crate::db::pool::PoolSettings;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default SQLite database location.
const DEFAULT_DATABASE_PATH: &str = "data/reviewers.db";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP port (`PORT`, required).
    pub port: u16,
    /// Listen address (`BIND_ADDR`).
    pub bind_addr: IpAddr,
    /// SQLite file (`DATABASE_PATH`).
    pub database_path: PathBuf,
    /// Pool sizing (`DB_MAX_CONNECTIONS`, `DB_BUSY_TIMEOUT_SECS`).
    pub pool: PoolSettings,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PoolSettings::default();

        let port = lookup("PORT").ok_or(ConfigError::Missing("PORT"))?;
        let port = parse("PORT", &port)?;

        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => parse("BIND_ADDR", &value)?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let database_path = lookup("DATABASE_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => parse::<u32>("DB_MAX_CONNECTIONS", &value)?,
            None => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }

        let busy_timeout = match lookup("DB_BUSY_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse("DB_BUSY_TIMEOUT_SECS", &value)?),
            None => defaults.busy_timeout,
        };

        Ok(Self {
            port,
            bind_addr,
            database_path,
            pool: PoolSettings {
                max_connections,
                busy_timeout,
            },
        })
    }

    /// Socket address the HTTP server listens on.
    pub fn listen_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
