pub mod auth;
pub mod cookies;
pub mod csrf;
pub mod security_headers;
pub mod session;
