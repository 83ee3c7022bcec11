//! Configuration management for the Drug Stock Dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with DSD_ prefix

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Dashboard behaviour
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Largest accepted upload body, in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Full PostgreSQL connection URL; takes precedence over the parts below
    pub url: Option<String>,

    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a free connection
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) if !url.trim().is_empty() => url.parse(),
            _ => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.name)
                .username(&self.user)
                .password(&self.password)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Contracts ending within this many days are listed as expiring
    pub contract_expiry_window_days: i64,

    /// Rows shown when previewing an upload
    pub preview_rows: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("DSD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = with_defaults(config::Config::builder(), &environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DSD_ prefix)
            .add_source(
                Environment::with_prefix("DSD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        shared::validation::validate_window_days(config.dashboard.contract_expiry_window_days)
            .map_err(ConfigError::Message)?;
        Ok(config)
    }
}

/// Built-in values every file and environment source layers over
fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
    environment: &str,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("environment", environment)?
        .set_default("server.port", 3000)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.max_upload_bytes", 20 * 1024 * 1024)?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.name", "dashboard_data")?
        .set_default("database.user", "postgres")?
        .set_default("database.password", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 2)?
        .set_default("database.acquire_timeout_secs", 30)?
        .set_default(
            "dashboard.contract_expiry_window_days",
            shared::DEFAULT_EXPIRY_WINDOW_DAYS,
        )?
        .set_default("dashboard.preview_rows", 5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(url: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            url: url.map(str::to_string),
            host: "db.internal".to_string(),
            port: 5433,
            name: "dashboard_data".to_string(),
            user: "reporter".to_string(),
            password: "secret".to_string(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
        }
    }

    #[test]
    fn test_defaults_alone_produce_a_full_config() {
        let config: Config = with_defaults(config::Config::builder(), "test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.environment, "test");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.database.url, None);
        assert_eq!(config.dashboard.contract_expiry_window_days, 90);
        assert_eq!(config.dashboard.preview_rows, 5);
    }

    #[test]
    fn test_connect_options_from_parts() {
        let options = database(None).connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("dashboard_data"));
    }

    #[test]
    fn test_connect_options_prefers_url() {
        let options = database(Some("postgres://u:p@example.org:6000/stock"))
            .connect_options()
            .unwrap();
        assert_eq!(options.get_host(), "example.org");
        assert_eq!(options.get_port(), 6000);
    }

    #[test]
    fn test_blank_url_falls_back_to_parts() {
        let options = database(Some("  ")).connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
    }
}
