use tower_cookies::{ CookieManagerLayer, Cookies, Cookie };
use cookie::SameSite;

pub const SESSION_COOKIE_NAME: &str = "report_session";

/// Expose cookie middleware layer
pub fn cookie_layer() -> CookieManagerLayer {
    CookieManagerLayer::new()
}

#[derive(Debug, Clone)]
pub struct SessionCookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for SessionCookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

impl SessionCookieOptions {
    pub fn for_environment(production: bool) -> Self {
        Self {
            secure: production,
            ..Default::default()
        }
    }
}

pub fn set_session_cookie(cookies: &Cookies, session_id: String, options: &SessionCookieOptions) {
    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, session_id);
    cookie.set_http_only(options.http_only);
    cookie.set_secure(options.secure);
    cookie.set_same_site(options.same_site);
    cookie.set_path(options.path.clone());

    cookies.add(cookie);
}

pub fn get_session_id(cookies: &Cookies) -> Option<String> {
    cookies.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string())
}
