use std::sync::Arc;

use axum::{ extract::State, response::{ Redirect, Response } };

use crate::{
    errors::HttpError,
    handlers::report_handlers::not_found_page,
    middleware::session::Session,
    AppState,
};

pub async fn root() -> Redirect {
    Redirect::to("/reports")
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn handler_404(
    State(state): State<Arc<AppState>>,
    session: Session
) -> Result<Response, HttpError> {
    not_found_page(&state, session.login_employee().await)
}
