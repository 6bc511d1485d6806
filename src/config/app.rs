use std::{ env, net::SocketAddr, str::FromStr };

use crate::config::ConfigError;

pub const DEFAULT_ROWS_PER_PAGE: i64 = 15;
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other =>
                Err(
                    ConfigError::Config(
                        format!("REPORT_STORE must be 'postgres' or 'memory', got '{}'", other)
                    )
                ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub rows_per_page: i64,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    /// Load from environment variables, falling back to development defaults.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080)?,
            store: env
                ::var("REPORT_STORE")
                .unwrap_or_else(|_| "postgres".to_string())
                .parse()?,
            rows_per_page: parse_or("REPORTS_PER_PAGE", DEFAULT_ROWS_PER_PAGE)?,
            session_ttl_minutes: parse_or("SESSION_TTL_MINUTES", DEFAULT_SESSION_TTL_MINUTES)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Config(format!("Invalid HOST/PORT: {}", e)))
    }

    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            store: StoreKind::Memory,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
    where T: FromStr, T::Err: std::fmt::Display
{
    match env::var(key) {
        Ok(raw) =>
            raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::Config(format!("Failed to parse {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
