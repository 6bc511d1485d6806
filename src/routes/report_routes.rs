use std::sync::Arc;

use axum::{ middleware::from_fn_with_state, routing::{ get, post }, Router };

use crate::{
    handlers::report_handlers::{ create, edit, entry_new, index, show, update },
    middleware::auth::require_login,
    AppState,
};

pub fn create_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(index))
        .route("/reports/new", get(entry_new))
        .route("/reports/{id}", get(show))
}

pub fn create_authenticated_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", post(create))
        .route("/reports/{id}/edit", get(edit))
        .route("/reports/{id}", post(update))
        .route_layer(from_fn_with_state(state, require_login))
}

pub fn report_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new().merge(create_public_routes()).merge(create_authenticated_routes(state))
}
