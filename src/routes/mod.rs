use std::sync::Arc;

use axum::{ middleware::from_fn_with_state, Router };
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{ cookies::cookie_layer, security_headers::security_headers },
    AppState,
};

pub mod auth_routes;
pub mod general_routes;
pub mod report_routes;

use auth_routes::auth_routes;
use general_routes::general_routes;
use report_routes::report_routes;

/// Main application router, ready to serve.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(report_routes(state.clone()))
        .merge(auth_routes())
        // Health check, root redirect and the 404 page
        .merge(general_routes())
        .layer(from_fn_with_state(state.clone(), security_headers))
        .layer(cookie_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
