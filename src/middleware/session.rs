use std::{ collections::HashMap, sync::Arc, time::{ Duration, Instant } };

use axum::{ extract::FromRequestParts, http::request::Parts };
use tokio::sync::RwLock;
use tower_cookies::Cookies;
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::HttpError,
    middleware::{
        cookies::{ get_session_id, set_session_cookie, SessionCookieOptions },
        csrf::{ generate_token, tokens_match },
    },
    models::LoginEmployee,
    AppState,
};

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub login_employee: Option<LoginEmployee>,
    pub flash: Option<String>,
    pub csrf_token: Option<String>,
}

#[derive(Debug)]
struct SessionEntry {
    data: SessionData,
    last_seen: Instant,
}

impl SessionEntry {
    fn new(data: SessionData) -> Self {
        Self { data, last_seen: Instant::now() }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() >= ttl
    }
}

/// Server-side session table keyed by the id held in the session cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores `data` under a new random id and returns the id.
    pub async fn insert(&self, data: SessionData) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.sessions.write().await.insert(id.clone(), SessionEntry::new(data));
        id
    }

    /// True when `id` names a live session; refreshes its idle timer.
    /// Expired sessions are dropped here.
    pub async fn touch(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(id) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                entry.last_seen = Instant::now();
                true
            }
            Some(_) => {
                sessions.remove(id);
                debug!("Session expired");
                false
            }
            None => false,
        }
    }

    pub async fn get(&self, id: &str) -> Option<SessionData> {
        self.sessions
            .read().await
            .get(id)
            .map(|entry| entry.data.clone())
    }

    /// Runs `f` against the session under the write lock.
    pub async fn update<F, R>(&self, id: &str, f: F) -> Option<R> where F: FnOnce(&mut SessionData) -> R {
        self.sessions
            .write().await
            .get_mut(id)
            .map(|entry| f(&mut entry.data))
    }

    pub async fn remove(&self, id: &str) -> Option<SessionData> {
        self.sessions
            .write().await
            .remove(id)
            .map(|entry| entry.data)
    }

    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(self.ttl));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// The caller's session. Extracting it creates a session (and sets the
/// cookie) when the request carries no live one.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
    cookies: Cookies,
    cookie_options: SessionCookieOptions,
}

impl Session {
    pub async fn login_employee(&self) -> Option<LoginEmployee> {
        self.store.get(&self.id).await.and_then(|data| data.login_employee)
    }

    /// Removes and returns the flash message in one locked step.
    pub async fn take_flash(&self) -> Option<String> {
        self.store.update(&self.id, |data| data.flash.take()).await.flatten()
    }

    pub async fn set_flash(&self, message: impl Into<String>) {
        let message = message.into();
        self.store.update(&self.id, move |data| {
            data.flash = Some(message);
        }).await;
    }

    /// Generates a new anti-forgery token, replacing the previous one.
    pub async fn issue_token(&self) -> String {
        let token = generate_token();
        let stored = token.clone();
        self.store.update(&self.id, move |data| {
            data.csrf_token = Some(stored);
        }).await;
        token
    }

    /// Checks a submitted form token. The issued token is consumed either
    /// way, so a form body cannot be replayed.
    pub async fn verify_token(&self, submitted: Option<&str>) -> bool {
        let issued = self.store.update(&self.id, |data| data.csrf_token.take()).await.flatten();
        tokens_match(issued.as_deref(), submitted)
    }

    /// Stores the employee under a new session id; the old id stops working.
    pub async fn login(&mut self, employee: LoginEmployee) {
        self.rotate(SessionData {
            login_employee: Some(employee),
            ..Default::default()
        }).await;
    }

    pub async fn logout(&mut self) {
        self.rotate(SessionData::default()).await;
    }

    async fn rotate(&mut self, data: SessionData) {
        self.store.remove(&self.id).await;
        self.id = self.store.insert(data).await;
        set_session_cookie(&self.cookies, self.id.clone(), &self.cookie_options);
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(session.clone());
        }

        let cookies = Cookies::from_request_parts(parts, state).await.map_err(|(_, message)|
            HttpError::server_error(message)
        )?;
        let store = state.sessions.clone();
        let cookie_options = SessionCookieOptions::for_environment(
            state.config.app.is_production()
        );

        let id = match get_session_id(&cookies) {
            Some(id) if store.touch(&id).await => id,
            _ => {
                let id = store.insert(SessionData::default()).await;
                set_session_cookie(&cookies, id.clone(), &cookie_options);
                id
            }
        };

        let session = Session { id, store, cookies, cookie_options };
        parts.extensions.insert(session.clone());

        Ok(session)
    }
}
