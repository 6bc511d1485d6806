// Configuration validation utilities

use url::Url;
use tracing::warn;

use crate::config::{ ConfigError, AppConfig, database::RawDatabaseConfig };

/// Comprehensive configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate database configuration
    pub fn validate_database_config(config: &RawDatabaseConfig) -> Result<(), ConfigError> {
        // Validate database URL format
        if
            !config.database_url.starts_with("postgresql://") &&
            !config.database_url.starts_with("postgres://")
        {
            return Err(
                ConfigError::Config(
                    "DATABASE_URL must be a valid PostgreSQL connection string".to_string()
                )
            );
        }

        // Try to parse the URL to validate format
        Url::parse(&config.database_url).map_err(|_| {
            ConfigError::Config("DATABASE_URL is not a valid URL".to_string())
        })?;

        if config.pool_size > 100 {
            warn!("DATABASE_POOL_SIZE is very high ({})", config.pool_size);
        }

        Ok(())
    }

    /// Validate server, paging and session settings
    pub fn validate_app_config(config: &AppConfig) -> Result<(), ConfigError> {
        if config.host.trim().is_empty() {
            return Err(ConfigError::Config("HOST cannot be empty".to_string()));
        }

        if config.rows_per_page < 1 || config.rows_per_page > 100 {
            return Err(
                ConfigError::Config("REPORTS_PER_PAGE must be between 1 and 100".to_string())
            );
        }

        if config.session_ttl_minutes < 1 || config.session_ttl_minutes > 1440 {
            // 1 minute to 24 hours
            return Err(
                ConfigError::Config(
                    "SESSION_TTL_MINUTES must be between 1 and 1440 minutes".to_string()
                )
            );
        }

        Ok(())
    }
}
