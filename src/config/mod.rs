pub mod app;
pub mod database;
pub mod logging;
pub mod validation;

pub use app::{ AppConfig, StoreKind };
pub use database::{ DatabaseConfig, ConfigError };

use validation::ConfigValidator;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    // Only present when reports live in PostgreSQL.
    pub database: Option<DatabaseConfig>,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let app = AppConfig::new()?;
        ConfigValidator::validate_app_config(&app)?;

        let database = match app.store {
            StoreKind::Postgres => Some(DatabaseConfig::new()?),
            StoreKind::Memory => None,
        };

        Ok(Self { app, database })
    }

    // FOR TESTING PURPOSES
    pub fn for_testing() -> Self {
        Self {
            app: AppConfig::for_testing(),
            database: None,
        }
    }
}
