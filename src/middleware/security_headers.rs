use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{ HeaderMap, HeaderValue, Request },
    middleware::Next,
    response::Response,
};

use crate::AppState;

// Pages carry a small inline <style> block and no scripts.
const PRODUCTION_CSP: &str =
    "default-src 'self'; \
     script-src 'none'; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; \
     object-src 'none'; \
     frame-ancestors 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     upgrade-insecure-requests";

const DEVELOPMENT_CSP: &str =
    "default-src 'self'; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; \
     frame-ancestors 'none'; \
     form-action 'self'";

pub async fn security_headers(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next
) -> Response {
    let mut response: Response = next.run(request).await;
    let production = state.config.app.is_production();

    apply_security_headers(response.headers_mut(), production);

    response
}

pub fn apply_security_headers(headers: &mut HeaderMap, production: bool) {
    headers.insert("X-DNS-Prefetch-Control", HeaderValue::from_static("off"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Permitted-Cross-Domain-Policies", HeaderValue::from_static("none"));
    headers.insert("Referrer-Policy", HeaderValue::from_static("strict-origin-when-cross-origin"));
    // Rendered pages embed session-bound form tokens.
    headers.insert("Cache-Control", HeaderValue::from_static("no-store"));
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static(
            "accelerometer=(), camera=(), geolocation=(), gyroscope=(), magnetometer=(), microphone=(), payment=(), usb=()"
        )
    );

    if production {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=15552000; includeSubDomains")
        );
        headers.insert("Content-Security-Policy", HeaderValue::from_static(PRODUCTION_CSP));
    } else {
        headers.insert("Content-Security-Policy", HeaderValue::from_static(DEVELOPMENT_CSP));
    }
}
