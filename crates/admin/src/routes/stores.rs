//! Store CRUD handlers.
//!
//! Stores are owned by the authenticated merchant; every query filters on
//! the owner column, so one merchant can never read or touch another's
//! rows. Deleting a store cascades to its products and orders.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use ridgeline_core::StoreId;

use crate::db::{RepositoryError, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::Store;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreNameRequest {
    #[serde(default)]
    pub name: String,
}

/// Create a store owned by the caller.
///
/// # Errors
///
/// Returns 400 when the name is missing or blank.
#[instrument(skip(state, payload), fields(owner = %owner))]
pub async fn create_store(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(payload): Json<StoreNameRequest>,
) -> Result<(StatusCode, Json<Store>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let store = StoreRepository::new(state.pool()).create(name, &owner).await?;

    Ok((StatusCode::CREATED, Json(store)))
}

/// List the caller's stores, newest first.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip(state), fields(owner = %owner))]
pub async fn list_stores(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<Json<Vec<Store>>> {
    let stores = StoreRepository::new(state.pool())
        .list_for_owner(&owner)
        .await?;

    Ok(Json(stores))
}

/// Fetch one of the caller's stores.
///
/// # Errors
///
/// Returns 404 when the store does not exist or belongs to someone else.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id))]
pub async fn get_store(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>> {
    let store = StoreRepository::new(state.pool())
        .get_owned(store_id, &owner)
        .await?
        .ok_or_else(|| AppError::NotFound("store not found".to_string()))?;

    Ok(Json(store))
}

/// Rename one of the caller's stores.
///
/// # Errors
///
/// Returns 400 when the name is missing and 405 when the store is not the
/// caller's to rename.
#[instrument(skip(state, payload), fields(owner = %owner, store_id = %store_id))]
pub async fn rename_store(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
    Json(payload): Json<StoreNameRequest>,
) -> Result<Json<Store>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let store = StoreRepository::new(state.pool())
        .rename(store_id, &owner, name)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotOwner,
            other => AppError::Database(other),
        })?;

    Ok(Json(store))
}

/// Delete one of the caller's stores, returning the deleted row.
///
/// # Errors
///
/// Returns 405 when the store is not the caller's to delete.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id))]
pub async fn delete_store(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>> {
    let store = StoreRepository::new(state.pool())
        .delete(store_id, &owner)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotOwner,
            other => AppError::Database(other),
        })?;

    tracing::info!(store_id = %store_id, "Store deleted");
    Ok(Json(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_request_tolerates_missing_name() {
        let request: StoreNameRequest = serde_json::from_str("{}").expect("parses");
        assert!(request.name.is_empty());
    }

    #[test]
    fn name_request_reads_name() {
        let request: StoreNameRequest =
            serde_json::from_str(r#"{"name": "Ridgeline Lagos"}"#).expect("parses");
        assert_eq!(request.name, "Ridgeline Lagos");
    }
}
