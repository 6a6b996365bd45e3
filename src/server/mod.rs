//! HTTP front end for the bridge.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /api/status` | Health and endpoint listing |
//! | `GET /auth/login` | Redirect to the consent page |
//! | `GET /auth/callback`, `GET /callback` | Complete authorization |
//! | `POST /api/refresh-token` | Refresh the session's shop tokens |
//! | `GET /api/shops` | Connected shops |
//! | `POST /api/update-price` | Set one item's price |
//! | `POST /api/update-stock` | Set one item's stock |
//! | `POST /api/batch-update` | Set price and stock for several items |
//!
//! # Example
//!
//! ```rust,ignore
//! let state = Arc::new(AppState::new(BridgeConfig::from_env()?)?);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, shopee_bridge::server::router(state)).await?;
//! ```

mod error;
mod routes;
mod session;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::{InMemoryTokenStore, TokenStore};
use crate::clients::{HttpError, PartnerClient};
use crate::config::BridgeConfig;

pub use error::ApiError;
pub use session::{
    new_session_id, session_cookie, session_id_from_headers, SessionData, SessionHandle,
    SessionStore, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL, SESSION_COOKIE,
};

/// Shared application state.
pub struct AppState {
    /// Startup configuration.
    pub config: BridgeConfig,
    /// Signed dispatcher for partner API calls.
    pub client: PartnerClient,
    /// Credentials of connected shops.
    pub store: Arc<dyn TokenStore>,
    /// Browser sessions.
    pub sessions: SessionStore,
}

impl AppState {
    /// Creates state with an empty in-memory token store.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be built.
    pub fn new(config: BridgeConfig) -> Result<Self, HttpError> {
        Self::with_store(config, Arc::new(InMemoryTokenStore::new()))
    }

    /// Creates state backed by the given token store.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be built.
    pub fn with_store(config: BridgeConfig, store: Arc<dyn TokenStore>) -> Result<Self, HttpError> {
        let client = PartnerClient::new(&config)?;
        Ok(Self {
            config,
            client,
            store,
            sessions: SessionStore::new(),
        })
    }
}

pub type SharedState = Arc<AppState>;

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}
