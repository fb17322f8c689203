use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

use crate::error::{ConfigError, LayoutError};
use crate::models::seat::{Layout, DEFAULT_ROWS, DEFAULT_SEATS_PER_ROW};

// Top-level configuration, assembled from flat environment settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub layout: LayoutConfig,
    pub store: StoreConfig,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub rows: usize,
    pub seats_per_row: usize,
}

impl LayoutConfig {
    pub fn layout(&self) -> Result<Layout, LayoutError> {
        Layout::new(self.rows, self.seats_per_row)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    pub lock_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Flat view of the environment: HOST, PORT, SEAT_ROWS, ... (keys lowercased).
#[derive(Debug, Deserialize, Validate)]
struct Settings {
    host: String,
    port: u16,
    environment: String,
    rust_log: String,
    log_format: String,
    #[validate(range(min = 1, max = 1000))]
    seat_rows: usize,
    #[validate(range(min = 1, max = 1000))]
    seats_per_row: usize,
    #[validate(range(min = 1))]
    lock_timeout_ms: u64,
    #[validate(length(min = 1))]
    database_url: Option<String>,
    #[validate(range(min = 1, max = 100))]
    db_pool_size: u32,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(config::Environment::default().try_parsing(true))
    }

    /// Builds the configuration from any `config` source layered over the defaults.
    pub fn load<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("environment", "development")?
            .set_default("rust_log", "seat_booking=debug,tower_http=debug")?
            .set_default("log_format", "pretty")?
            .set_default("seat_rows", DEFAULT_ROWS as u64)?
            .set_default("seats_per_row", DEFAULT_SEATS_PER_ROW as u64)?
            .set_default("lock_timeout_ms", 2000)?
            .set_default("db_pool_size", 5)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        settings.try_into()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

impl TryFrom<Settings> for Config {
    type Error = ConfigError;

    fn try_from(s: Settings) -> Result<Self, Self::Error> {
        let log_format = match s.log_format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => return Err(ConfigError::LogFormat(s.log_format)),
        };

        Ok(Config {
            app: AppConfig {
                host: s.host,
                port: s.port,
                environment: s.environment,
                rust_log: s.rust_log,
                log_format,
            },
            layout: LayoutConfig {
                rows: s.seat_rows,
                seats_per_row: s.seats_per_row,
            },
            store: StoreConfig {
                lock_timeout: Duration::from_millis(s.lock_timeout_ms),
            },
            database: s.database_url.map(|url| DatabaseConfig {
                url,
                pool_size: s.db_pool_size,
            }),
        })
    }
}
