// Library entry point - exposes the daily report server as a reusable library

pub mod config;
pub mod models;
pub mod dto;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod middleware;
pub mod handlers;
pub mod routes;
pub mod views;

pub mod schema;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::{ Config, ConfigError, DatabaseConfig };
pub use errors::{ HttpError, ErrorMessage };
pub use repositories::{ DataStore, MemoryStore, PgStore };
pub use services::{ auth_service::AuthService, report_service::ReportService };

use std::{ sync::Arc, time::Duration };

use axum::Router;
use tokio::task::JoinHandle;
use tracing::{ debug, info };

use config::StoreKind;
use middleware::session::SessionStore;
use views::Views;

// Application state shared by every handler
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DataStore>,
    pub sessions: SessionStore,
    pub views: Arc<Views>,
}

impl AppState {
    /// Builds the state for the configured report store. For PostgreSQL the
    /// pending migrations run first.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let store: Arc<dyn DataStore> = match (config.app.store, &config.database) {
            (StoreKind::Postgres, Some(database)) => {
                database.run_migrations()?;
                Arc::new(PgStore::new(database.pool.clone()))
            }
            (StoreKind::Postgres, None) => {
                return Err(ConfigError::Config("DATABASE_URL is required for postgres".into()));
            }
            (StoreKind::Memory, _) => {
                info!("Reports are kept in memory and lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn DataStore>) -> Result<Self, ConfigError> {
        let views = Views::new().map_err(|e| ConfigError::Template(e.to_string()))?;
        let ttl = Duration::from_secs(config.app.session_ttl_minutes.max(1) as u64 * 60);

        Ok(Self {
            config,
            store,
            sessions: SessionStore::new(ttl),
            views: Arc::new(views),
        })
    }
}

/// Create the complete application router
pub fn create_app(state: Arc<AppState>) -> Router {
    routes::create_router(state)
}

/// Loads configuration, prepares the store and seeds the first employee.
pub fn initialize_app() -> Result<(Arc<AppState>, Router), ConfigError> {
    let config = Config::new()?;
    let state = Arc::new(AppState::new(config)?);

    AuthService::seed_initial_employee(state.store.as_ref()).map_err(|e|
        ConfigError::Config(format!("Initial employee seeding failed: {}", e))
    )?;

    let router = create_app(state.clone());

    Ok((state, router))
}

/// Periodically drops idle sessions from the session table.
pub fn spawn_session_reaper(sessions: SessionStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                debug!("Purged {} expired session(s)", purged);
            }
        }
    })
}
