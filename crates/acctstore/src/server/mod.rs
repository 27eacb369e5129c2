mod accounts;
mod auth;
mod error;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{any, get, post};
use axum::{middleware, Json, Router};
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use acctstore_core::AccountStore;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    /// Held for writing across each mutation and its snapshot write.
    pub accounts: Arc<RwLock<AccountStore>>,
    pub api_token: String,
}

type SharedState = Arc<AppState>;

// Account payloads are a handful of short strings.
const BODY_LIMIT: usize = 64 * 1024;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    // Only reflect the allowed origin when the request's Origin header
    // actually matches; anything else gets no CORS headers at all.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |request_origin: &HeaderValue, _| *request_origin == allowed_origin,
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(auth::API_TOKEN_HEADER),
        ]);

    let shared = Arc::new(state);

    let public_api = Router::new().route("/api/v1/health", get(health));

    let protected_api = Router::new()
        .route(
            "/api/v1/accounts",
            get(accounts::list_accounts).post(accounts::add_account),
        )
        .route("/api/v1/accounts/raw", get(accounts::list_raw_accounts))
        .route("/api/v1/accounts/export", get(accounts::export_accounts))
        .route(
            "/api/v1/accounts/{id}",
            post(accounts::update_account_field).delete(accounts::delete_account),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .route_layer(middleware::from_fn_with_state(
            shared.clone(),
            auth::require_api_token,
        ));

    Router::new()
        .merge(public_api)
        .merge(protected_api)
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .layer(cors)
        .with_state(shared)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_not_found() -> error::AppError {
    error::AppError::NotFound("API route not found".to_string())
}
