//! Cookie-backed web sessions.
//!
//! Each browser gets an opaque session ID in the `bridge_session` cookie.
//! The ID maps to a [`SessionData`] held in memory: the merchant's
//! [`AuthorizationState`] and, once a shop is connected, its
//! [`SessionCredentials`].
//!
//! The store is bounded. When it is full, the least recently used session is
//! evicted, and a session idle for longer than the TTL is treated as gone.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use base64::prelude::*;
use lru::LruCache;
use parking_lot::Mutex;
use rand::RngCore;

use crate::auth::oauth::AuthorizationState;
use crate::auth::SessionCredentials;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "bridge_session";

/// Random bytes in a session ID.
const SESSION_ID_BYTES: usize = 32;

/// Default maximum number of live sessions.
pub const DEFAULT_MAX_SESSIONS: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Default idle lifetime of a session (24 hours).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-browser session state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionData {
    /// Progress through the authorization flow.
    pub auth_state: AuthorizationState,
    /// Credentials of the shop connected in this session, if any.
    pub credentials: Option<SessionCredentials>,
}

/// The session a request belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionHandle {
    /// The session ID.
    pub id: String,
    /// `true` when the ID was minted for this request and must be sent
    /// back in a `Set-Cookie` header.
    pub is_new: bool,
}

impl SessionHandle {
    /// Adds the session cookie to `response` if the session is new.
    pub fn attach(&self, response: &mut Response) {
        if !self.is_new {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&session_cookie(&self.id)) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    data: SessionData,
    touched: Instant,
}

impl SessionEntry {
    fn fresh() -> Self {
        Self {
            data: SessionData::default(),
            touched: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.touched.elapsed() >= ttl
    }
}

/// In-memory session storage with LRU eviction and an idle TTL.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<LruCache<String, SessionEntry>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_config(DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    /// Creates an empty store with the default capacity and TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store holding at most `max_sessions` sessions, each
    /// expiring after `ttl` without use.
    #[must_use]
    pub fn with_config(max_sessions: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(max_sessions)),
            ttl,
        }
    }

    /// Returns the number of cached sessions, expired ones included until
    /// they are next touched or evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Returns `true` if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Returns the session data for the request's cookie, if the session
    /// exists and has not expired.
    #[must_use]
    pub fn load(&self, headers: &HeaderMap) -> Option<SessionData> {
        let id = session_id_from_headers(headers)?;
        let mut sessions = self.sessions.lock();

        if sessions.peek(&id)?.is_expired(self.ttl) {
            sessions.pop(&id);
            return None;
        }
        sessions.get_mut(&id).map(|entry| {
            entry.touched = Instant::now();
            entry.data.clone()
        })
    }

    /// Returns the request's session, minting a new ID when the cookie is
    /// absent or names an unknown or expired session.
    ///
    /// Nothing is stored until [`SessionStore::update`] is called.
    #[must_use]
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        match session_id_from_headers(headers) {
            Some(id) if self.is_live(&id) => SessionHandle { id, is_new: false },
            _ => SessionHandle {
                id: new_session_id(),
                is_new: true,
            },
        }
    }

    /// Applies `f` to a session, creating it first if needed.
    ///
    /// Inserting into a full store evicts the least recently used session.
    pub fn update<F>(&self, handle: &SessionHandle, f: F) -> SessionData
    where
        F: FnOnce(&mut SessionData),
    {
        let mut sessions = self.sessions.lock();
        let mut entry = sessions
            .pop(&handle.id)
            .filter(|entry| !entry.is_expired(self.ttl))
            .unwrap_or_else(SessionEntry::fresh);

        f(&mut entry.data);
        entry.touched = Instant::now();
        let data = entry.data.clone();

        if let Some((evicted, _)) = sessions.push(handle.id.clone(), entry) {
            if evicted != handle.id {
                tracing::debug!(capacity = sessions.cap().get(), "Evicted least recently used session");
            }
        }
        data
    }

    fn is_live(&self, id: &str) -> bool {
        self.sessions
            .lock()
            .peek(id)
            .is_some_and(|entry| !entry.is_expired(self.ttl))
    }
}

/// Generates a session ID from 256 random bits.
#[must_use]
pub fn new_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Reads the session ID from the request's `Cookie` headers.
#[must_use]
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Formats the `Set-Cookie` value for a session.
#[must_use]
pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

// Verify SessionStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SessionStore>();
};
