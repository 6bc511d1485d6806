/*
----------------------------------------------------- PURPOSE ------------------------------------------------------------------
Gate the report write routes: only a session with a logged-in employee gets through, and that employee is handed to the handler.
*/

use axum::{
    extract::Request,
    middleware::Next,
    response::{ IntoResponse, Redirect, Response },
};
use tracing::debug;

use crate::{ middleware::session::Session, models::LoginEmployee };

/// Logged-in employee attached to requests that passed `require_login`.
#[derive(Debug, Clone)]
pub struct CurrentEmployee(pub LoginEmployee);

pub async fn require_login(session: Session, mut req: Request, next: Next) -> Response {
    let Some(employee) = session.login_employee().await else {
        debug!("Anonymous request to {} redirected to login", req.uri().path());
        return Redirect::to("/login").into_response();
    };

    req.extensions_mut().insert(CurrentEmployee(employee));

    next.run(req).await
}
