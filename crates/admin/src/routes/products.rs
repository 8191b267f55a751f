//! Product management handlers.
//!
//! Creates and updates always carry the complete product form; an update
//! replaces every field and the whole image set in one transaction.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use ridgeline_core::{Price, ProductId, StoreId};

use crate::db::{ProductInput, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::Product;
use crate::state::AppState;

use super::ensure_store_owner;

#[derive(Debug, Deserialize)]
pub struct ImagePayload {
    pub url: String,
}

/// Complete product form as the dashboard submits it.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub name: String,
    pub price: Option<Price>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_sold: bool,
    #[serde(default)]
    pub is_archived: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub is_featured: Option<bool>,
}

/// Check the required fields, in the order the dashboard reports them.
fn validate_payload(payload: &ProductPayload) -> Result<(Price, Vec<String>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if payload.images.is_empty() {
        return Err(AppError::BadRequest("Images are required".to_string()));
    }
    let Some(price) = payload.price else {
        return Err(AppError::BadRequest("Price is required".to_string()));
    };

    let urls = payload
        .images
        .iter()
        .map(|image| image.url.clone())
        .collect();

    Ok((price, urls))
}

/// Create a product with its images.
///
/// # Errors
///
/// Returns 400 when a required field is missing and 405 when the store is
/// not the caller's.
#[instrument(skip(state, payload), fields(owner = %owner, store_id = %store_id))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>)> {
    let (price, urls) = validate_payload(&payload)?;
    ensure_store_owner(&state, store_id, &owner).await?;

    let product = ProductRepository::new(state.pool())
        .create(
            store_id,
            &ProductInput {
                name: payload.name.trim(),
                price,
                description: payload.description.as_deref(),
                is_featured: payload.is_featured,
                is_sold: payload.is_sold,
                is_archived: payload.is_archived,
                image_urls: &urls,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// List the store's products, newest first, images embedded.
///
/// # Errors
///
/// Returns 405 when the store is not the caller's.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id))]
pub async fn list_products(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    ensure_store_owner(&state, store_id, &owner).await?;

    let products = ProductRepository::new(state.pool())
        .list_for_store(store_id, query.is_featured)
        .await?;

    Ok(Json(products))
}

/// Fetch one product with its images.
///
/// # Errors
///
/// Returns 404 when the product does not exist in this store and 405 when
/// the store is not the caller's.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id, product_id = %product_id))]
pub async fn get_product(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
) -> Result<Json<Product>> {
    ensure_store_owner(&state, store_id, &owner).await?;

    let product = ProductRepository::new(state.pool())
        .get_in_store(store_id, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

    Ok(Json(product))
}

/// Replace a product's fields and image set.
///
/// # Errors
///
/// Returns 400 when a required field is missing, 404 when the product does
/// not exist, and 405 when the store is not the caller's.
#[instrument(skip(state, payload), fields(owner = %owner, store_id = %store_id, product_id = %product_id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    let (price, urls) = validate_payload(&payload)?;
    ensure_store_owner(&state, store_id, &owner).await?;

    let product = ProductRepository::new(state.pool())
        .update(
            store_id,
            product_id,
            &ProductInput {
                name: payload.name.trim(),
                price,
                description: payload.description.as_deref(),
                is_featured: payload.is_featured,
                is_sold: payload.is_sold,
                is_archived: payload.is_archived,
                image_urls: &urls,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("product not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(product))
}

/// Delete a product, returning the deleted row.
///
/// # Errors
///
/// Returns 404 when the product does not exist and 405 when the store is
/// not the caller's.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id, product_id = %product_id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path((store_id, product_id)): Path<(StoreId, ProductId)>,
) -> Result<Json<Product>> {
    ensure_store_owner(&state, store_id, &owner).await?;

    let product = ProductRepository::new(state.pool())
        .delete_in_store(store_id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("product not found".to_string()),
            other => AppError::Database(other),
        })?;

    tracing::info!(product_id = %product_id, "Product deleted");
    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_from(json: &str) -> ProductPayload {
        serde_json::from_str(json).expect("parses")
    }

    #[test]
    fn missing_name_is_reported_first() {
        let payload = payload_from(r#"{"images": [{"url": "https://img/a.jpg"}]}"#);
        let error = validate_payload(&payload).expect_err("rejects");
        assert!(error.to_string().contains("Name is required"));
    }

    #[test]
    fn missing_images_reported_before_price() {
        let payload = payload_from(r#"{"name": "Alpine Shell"}"#);
        let error = validate_payload(&payload).expect_err("rejects");
        assert!(error.to_string().contains("Images are required"));
    }

    #[test]
    fn missing_price_is_reported_last() {
        let payload =
            payload_from(r#"{"name": "Alpine Shell", "images": [{"url": "https://img/a.jpg"}]}"#);
        let error = validate_payload(&payload).expect_err("rejects");
        assert!(error.to_string().contains("Price is required"));
    }

    #[test]
    fn complete_payload_passes_with_flag_defaults() {
        let payload = payload_from(
            r#"{"name": "Alpine Shell", "price": "18500.00",
                "images": [{"url": "https://img/a.jpg"}, {"url": "https://img/b.jpg"}]}"#,
        );
        let (price, urls) = validate_payload(&payload).expect("valid");
        assert_eq!(price.to_string(), "₦18500.00");
        assert_eq!(urls.len(), 2);
        assert!(!payload.is_featured);
        assert!(!payload.is_archived);
    }
}
