use std::sync::Arc;

use axum::{
    extract::State,
    response::{ IntoResponse, Redirect, Response },
    Form,
};
use tracing::{ error, info, warn };

use crate::{
    dto::auth_dtos::{ LoginContext, LoginForm, LogoutContext, TokenForm },
    errors::{ ErrorMessage, HttpError, InfoMessage },
    handlers::report_handlers::forbidden_page,
    middleware::session::Session,
    services::auth_service::{ AuthError, AuthService },
    views::{ LOGIN, LOGOUT },
    AppState,
};

async fn render_login(
    state: &AppState,
    session: &Session,
    code: String,
    errors: Vec<String>
) -> Result<Response, HttpError> {
    let context = LoginContext {
        login_employee: session.login_employee().await,
        flash: session.take_flash().await,
        token: session.issue_token().await,
        code,
        errors,
    };

    Ok(state.views.render(LOGIN, &context)?.into_response())
}

/// GET /login
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    session: Session
) -> Result<Response, HttpError> {
    render_login(&state, &session, String::new(), Vec::new()).await
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Form(form): Form<LoginForm>
) -> Result<Response, HttpError> {
    if !session.verify_token(form.token.as_deref()).await {
        warn!("Rejected login attempt: bad form token");
        return forbidden_page(&state, None);
    }

    // argon2 verification is CPU bound
    let store = state.store.clone();
    let code = form.code.clone();
    let password = form.password;
    let outcome = tokio::task
        ::spawn_blocking(move || AuthService::authenticate(store.as_ref(), &code, &password)).await
        .map_err(|e| {
            error!("Login task failed: {}", e);
            HttpError::server_error(ErrorMessage::InternalServerError.to_string())
        })?;

    match outcome {
        Ok(employee) => {
            info!("Employee {} logged in", employee.code);
            session.login(employee).await;
            session.set_flash(InfoMessage::LoggedIn.to_string()).await;
            Ok(Redirect::to("/reports").into_response())
        }
        Err(AuthError::WrongCredentials) => {
            info!("Failed login for code '{}'", form.code.trim());
            render_login(
                &state,
                &session,
                form.code,
                vec![ErrorMessage::WrongCredentials.to_string()]
            ).await
        }
        Err(e) => {
            error!("Login failed: {}", e);
            Err(HttpError::server_error(ErrorMessage::InternalServerError.to_string()))
        }
    }
}

/// GET /logout, a confirmation page carrying the token for the POST.
pub async fn logout_form(
    State(state): State<Arc<AppState>>,
    session: Session
) -> Result<Response, HttpError> {
    let context = LogoutContext {
        login_employee: session.login_employee().await,
        token: session.issue_token().await,
    };

    Ok(state.views.render(LOGOUT, &context)?.into_response())
}

/// POST /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Form(form): Form<TokenForm>
) -> Result<Response, HttpError> {
    let login_employee = session.login_employee().await;

    if !session.verify_token(form.token.as_deref()).await {
        warn!("Rejected logout: bad form token");
        return forbidden_page(&state, login_employee);
    }

    if let Some(employee) = login_employee {
        info!("Employee {} logged out", employee.code);
    }

    session.logout().await;
    session.set_flash(InfoMessage::LoggedOut.to_string()).await;

    Ok(Redirect::to("/login").into_response())
}
