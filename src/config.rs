// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::utils::retry::RetryStrategy;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub server_addr: SocketAddr,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub query_retry: RetryStrategy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// `from_env` is a thin wrapper over the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let server_addr = parse_or(&lookup, "SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let acquire_timeout_secs = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3u64)?;

        let attempts = parse_or(&lookup, "QUERY_RETRY_ATTEMPTS", 3u32)?;
        let delay_ms = parse_or(&lookup, "QUERY_RETRY_DELAY_MS", 100u64)?;
        let backoff = parse_or(&lookup, "QUERY_RETRY_BACKOFF", 1.5f64)?;
        if !backoff.is_finite() || backoff < 1.0 {
            return Err(ConfigError::Invalid {
                name: "QUERY_RETRY_BACKOFF",
                value: backoff.to_string(),
            });
        }

        Ok(Self {
            database_url,
            rust_log,
            server_addr,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            query_retry: RetryStrategy::new(attempts, Duration::from_millis(delay_ms), backoff),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
