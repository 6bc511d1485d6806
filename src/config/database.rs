use std::{ env, time::Duration };

use thiserror::Error;
use diesel::{
    PgConnection,
    r2d2::{ Pool, ConnectionManager, PoolError as R2D2Error },
};
use diesel_migrations::{ embed_migrations, EmbeddedMigrations, MigrationHarness };
use serde::Deserialize;
use tracing::info;

use crate::config::validation::ConfigValidator;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEFAULT_POOL_SIZE: u32 = 15;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")] MissingEnv(#[from] env::VarError),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Connection pool error: {0}")] Pool(#[from] R2D2Error),

    #[error("Migration error: {0}")] Migration(String),

    #[error("Template error: {0}")] Template(String),
}

/*
serde::Deserialize cannot be derived for Pool<ConnectionManager<PgConnection>>,
so the config is split in two:
      - RawDatabaseConfig holds the plain values read from the environment
      - DatabaseConfig adds the live pool built from them
*/

#[derive(Debug, Deserialize, Clone)]
pub struct RawDatabaseConfig {
    pub database_url: String,
    pub pool_size: u32,
}

// Basic validation to check for empty strings or invalid numbers
impl RawDatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Config("DATABASE_URL cannot be empty".into()));
        }
        if self.pool_size == 0 {
            return Err(ConfigError::Config("DATABASE_POOL_SIZE must be greater than zero".into()));
        }

        ConfigValidator::validate_database_config(self)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub pool: PgPool,
}

impl DatabaseConfig {
    /// Build from a RawDatabaseConfig (which contains loaded fields).
    pub fn from_raw(raw: RawDatabaseConfig) -> Result<Self, ConfigError> {
        raw.validate()?;
        let manager = ConnectionManager::<PgConnection>::new(&raw.database_url);
        let pool = Pool::builder()
            .max_size(raw.pool_size)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        Ok(Self {
            pool,
            database_url: raw.database_url,
        })
    }

    /// Load from environment variables and build the config.
    pub fn new() -> Result<Self, ConfigError> {
        let raw = RawDatabaseConfig {
            database_url: env::var("DATABASE_URL")?,
            pool_size: match env::var("DATABASE_POOL_SIZE") {
                Ok(value) =>
                    value
                        .parse()
                        .map_err(|e| {
                            ConfigError::Config(
                                format!("Failed to parse DATABASE_POOL_SIZE: {}", e)
                            )
                        })?,
                Err(_) => DEFAULT_POOL_SIZE,
            },
        };

        DatabaseConfig::from_raw(raw)
    }

    /// Apply any pending embedded migrations.
    pub fn run_migrations(&self) -> Result<(), ConfigError> {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| ConfigError::Migration(e.to_string()))?;

        info!("Applied {} pending migration(s)", applied.len());

        Ok(())
    }
}
