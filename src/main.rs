use std::{ error::Error as StdError, time::Duration };

use dotenvy::dotenv;
use tracing::{ error, info };

use daily_report::{ config::logging::init_logging, initialize_app, spawn_session_reaper };

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    dotenv().ok();
    init_logging();

    let (state, app) = initialize_app().map_err(|e| {
        error!("Failed to start: {}", e);
        e
    })?;

    spawn_session_reaper(state.sessions.clone(), Duration::from_secs(60));

    let addr = state.config.app.bind_addr()?;
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
