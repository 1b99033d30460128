use std::{env, time::Duration};

use arcade_core::PoolSettings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded via environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Deployment label reported by the healthcheck.
    pub environment: String,
    /// Origins allowed by CORS. Empty disables the CORS layer.
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_idle_time: Duration,
    /// Deadline applied to every catalog statement.
    pub query_timeout: Duration,
}

impl DatabaseConfig {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            idle_timeout: self.max_idle_time,
            query_timeout: self.query_timeout,
            ..PoolSettings::default()
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let defaults = PoolSettings::default();

        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 4000)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::MissingDatabaseUrl)?,
                max_connections: parse_var(
                    "DB_MAX_CONNECTIONS",
                    defaults.max_connections,
                )?,
                min_connections: parse_var(
                    "DB_MIN_CONNECTIONS",
                    defaults.min_connections,
                )?,
                max_idle_time: duration_var(
                    "DB_MAX_IDLE_TIME",
                    defaults.idle_timeout,
                )?,
                query_timeout: duration_var(
                    "DB_QUERY_TIMEOUT",
                    defaults.query_timeout,
                )?,
            },
            environment: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_csv(&raw))
                .unwrap_or_default(),
        })
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| {
            ConfigError::InvalidValue {
                key,
                value: raw,
                reason: e.to_string(),
            }
        }),
        Err(_) => Ok(default),
    }
}

fn duration_var(
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(raw) => humantime::parse_duration(raw.trim()).map_err(|e| {
            ConfigError::InvalidValue {
                key,
                value: raw,
                reason: e.to_string(),
            }
        }),
        Err(_) => Ok(default),
    }
}

pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_drops_blanks() {
        assert_eq!(
            split_csv(" http://a.test ,,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn pool_settings_carry_query_timeout() {
        let database = DatabaseConfig {
            url: "postgres://localhost/arcade".to_string(),
            max_connections: 8,
            min_connections: 1,
            max_idle_time: Duration::from_secs(60),
            query_timeout: Duration::from_millis(1500),
        };

        let settings = database.pool_settings();
        assert_eq!(settings.max_connections, 8);
        assert_eq!(settings.min_connections, 1);
        assert_eq!(settings.idle_timeout, Duration::from_secs(60));
        assert_eq!(settings.query_timeout, Duration::from_millis(1500));
    }
}
