use std::sync::Arc;

use axum::{ routing::get, Router };

use crate::{ handlers::auth_handlers::{ login, login_form, logout, logout_form }, AppState };

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout_form).post(logout))
}
