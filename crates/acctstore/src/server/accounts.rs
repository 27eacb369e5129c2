use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use acctstore_core::accounts::{AccountField, AccountStore, DerivedRecord, StoredRecord};

use super::error::{map_store_error, AppError};
use super::SharedState;

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct UpdateFieldRequest {
    field: String,
    value: String,
}

// ==============================================================================
// Handlers
// ==============================================================================

pub(super) async fn list_accounts(State(state): State<SharedState>) -> Json<Vec<DerivedRecord>> {
    let store = state.accounts.read().await;
    Json(store.accounts())
}

pub(super) async fn list_raw_accounts(State(state): State<SharedState>) -> Json<Vec<StoredRecord>> {
    let store = state.accounts.read().await;
    Json(store.records().to_vec())
}

pub(super) async fn add_account(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<DerivedRecord>), AppError> {
    let mut store = state.accounts.write().await;
    let record = store.add_account();
    ensure_persisted(&mut store)?;
    Ok((StatusCode::CREATED, Json(DerivedRecord::from(&record))))
}

pub(super) async fn update_account_field(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    req: Result<Json<UpdateFieldRequest>, JsonRejection>,
) -> Result<Json<DerivedRecord>, AppError> {
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let field: AccountField = req.field.parse().map_err(map_store_error)?;

    let mut store = state.accounts.write().await;
    if !store.update_field(&id, field, req.value) {
        return Err(account_not_found(&id));
    }
    ensure_persisted(&mut store)?;

    store
        .account(&id)
        .map(Json)
        .ok_or_else(|| AppError::Internal("updated account was not found".to_string()))
}

pub(super) async fn delete_account(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut store = state.accounts.write().await;
    if !store.remove_account(&id) {
        return Err(account_not_found(&id));
    }
    ensure_persisted(&mut store)?;

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

pub(super) async fn export_accounts(
    State(state): State<SharedState>,
) -> Result<Response, AppError> {
    let store = state.accounts.read().await;
    let content = store.export_json().map_err(map_store_error)?;

    let mut response = (StatusCode::OK, content).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"accounts.json\""),
    );
    Ok(response)
}

// ==============================================================================
// Helpers
// ==============================================================================

/// Surface a failed snapshot write. The mutation itself is kept in memory
/// either way; this retries the write once and reports if it still fails.
fn ensure_persisted(store: &mut AccountStore) -> Result<(), AppError> {
    store.sync().map_err(map_store_error)
}

fn account_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("account not found: {id}"))
}
