//! Route handlers.
//!
//! All handlers receive [`SharedState`] via Axum state extraction.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::oauth::{begin_auth, complete_auth, refresh_access_token, AuthCallback};
use crate::auth::{requested_shop_id, resolve_credentials, ResolvedCredentials, SessionCredentials};
use crate::products::{batch_update, update_price, update_stock, PriceUpdate, StockUpdate};
use crate::server::error::ApiError;
use crate::server::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        // Health
        .route("/api/status", get(status))
        // Authorization
        .route("/auth/login", get(auth_login))
        .route("/auth/callback", get(auth_callback))
        .route("/callback", get(auth_callback))
        .route("/api/refresh-token", post(refresh_token))
        // Shops and products
        .route("/api/shops", get(shops))
        .route("/api/update-price", post(price))
        .route("/api/update-stock", post(stock))
        .route("/api/batch-update", post(batch))
        .with_state(state)
}

async fn status(State(state): State<SharedState>) -> impl IntoResponse {
    let mode = if state.config.base_url().is_test_environment() {
        "TEST"
    } else {
        "PRODUCTION"
    };

    Json(json!({
        "status": "running",
        "mode": mode,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/auth/login",
            "callback": "/auth/callback",
            "shops": "/api/shops",
            "update_price": "/api/update-price",
            "update_stock": "/api/update-stock",
            "batch_update": "/api/batch-update",
            "refresh_token": "/api/refresh-token",
        },
    }))
}

/// GET /auth/login: redirect the merchant to the consent page.
async fn auth_login(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let result = begin_auth(&state.config, Utc::now().timestamp())?;

    let session = state.sessions.resolve(&headers);
    state
        .sessions
        .update(&session, |s| s.auth_state = s.auth_state.begin());

    let mut response = Redirect::to(&result.auth_url).into_response();
    session.attach(&mut response);
    Ok(response)
}

/// GET /auth/callback and GET /callback: exchange the code and connect the shop.
async fn auth_callback(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(callback): Query<AuthCallback>,
) -> Response {
    let session = state.sessions.resolve(&headers);

    let mut response = match complete_auth(&state.client, state.store.as_ref(), &callback).await {
        Ok(record) => {
            state.sessions.update(&session, |s| {
                s.auth_state = s.auth_state.authorize();
                s.credentials = Some(SessionCredentials {
                    access_token: record.access_token.clone(),
                    refresh_token: record.refresh_token.clone(),
                    shop_id: record.shop_id.clone(),
                    expire_in: record.expire_in,
                });
            });

            Json(json!({
                "message": "Shop connected successfully",
                "shop_id": record.shop_id,
                "shop_name": record.shop_name,
                "expire_in": record.expire_in,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::warn!("Authorization callback failed: {e}");
            // A fresh session would only record the failure; keep nothing.
            if session.is_new {
                return ApiError::from(e).into_response();
            }
            state
                .sessions
                .update(&session, |s| s.auth_state = s.auth_state.fail());
            ApiError::from(e).into_response()
        }
    };

    session.attach(&mut response);
    response
}

/// POST /api/refresh-token: refresh the session's shop tokens.
async fn refresh_token(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let credentials = state
        .sessions
        .load(&headers)
        .and_then(|s| s.credentials)
        .filter(|c| !c.refresh_token.is_empty() && !c.shop_id.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("No refresh token or shop_id found".to_string()))?;

    let token = refresh_access_token(
        &state.client,
        state.store.as_ref(),
        &credentials.shop_id,
        &credentials.refresh_token,
    )
    .await?;

    let session = state.sessions.resolve(&headers);
    state.sessions.update(&session, |s| {
        if let Some(c) = s.credentials.as_mut() {
            c.access_token.clone_from(&token.access_token);
            c.refresh_token.clone_from(&token.refresh_token);
            c.expire_in = token.expire_in;
        }
    });

    Ok(Json(json!({
        "message": "Token refreshed successfully",
        "expire_in": token.expire_in,
    })))
}

/// GET /api/shops: every connected shop.
async fn shops(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "shops": state.store.list_all() }))
}

/// Resolves credentials from the session, then from the body's `shop_id`.
fn credentials_for(
    state: &SharedState,
    headers: &HeaderMap,
    body: &Value,
) -> Result<ResolvedCredentials, ApiError> {
    let session = state.sessions.load(headers).and_then(|s| s.credentials);
    let shop_id = requested_shop_id(body);

    resolve_credentials(session.as_ref(), shop_id.as_deref(), state.store.as_ref())
        .map_err(ApiError::from)
}

/// POST /api/update-price
async fn price(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let credentials = credentials_for(&state, &headers, &body)?;
    let update = PriceUpdate::from_json(&body)?;

    Ok(Json(update_price(&state.client, &credentials, &update).await))
}

/// POST /api/update-stock
async fn stock(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let credentials = credentials_for(&state, &headers, &body)?;
    let update = StockUpdate::from_json(&body)?;

    Ok(Json(update_stock(&state.client, &credentials, &update).await))
}

/// POST /api/batch-update
async fn batch(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let credentials = credentials_for(&state, &headers, &body)?;
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);

    let results = batch_update(&state.client, &credentials, items).await?;

    Ok(Json(json!({ "results": results })))
}
