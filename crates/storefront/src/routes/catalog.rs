//! Public product catalog handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use ridgeline_core::{ProductId, StoreId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub is_featured: Option<bool>,
}

/// List a store's products, newest first, images embedded.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip(state), fields(store_id = %store_id))]
pub async fn list_products(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_store(store_id, query.is_featured)
        .await?;

    Ok(Json(products))
}

/// Fetch one product with its images.
///
/// # Errors
///
/// Returns 404 when the product does not exist in this store.
#[instrument(skip(state), fields(store_id = %store_id, product_id = %product_id))]
pub async fn get_product(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .filter(|p| p.store_id == store_id)
        .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

    Ok(Json(product))
}
