//! Catalog models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ridgeline_core::{Price, ProductId, ProductImageId, StoreId};

/// A product with its image set.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    pub is_featured: bool,
    pub is_sold: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Populated by the repository after the row fetch.
    #[sqlx(skip)]
    pub images: Vec<ProductImage>,
}

/// One image attached to a product, ordered by `position`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub url: String,
    pub position: i32,
}
