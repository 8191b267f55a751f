//! Catalog read repository.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use ridgeline_core::{OrderId, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{Product, ProductImage};

/// Repository for catalog reads and sold-state updates.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's products newest-first, optionally filtered by the
    /// featured flag, with images attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_store(
        &self,
        store_id: StoreId,
        is_featured: Option<bool>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, store_id, name, price, description,
                   is_featured, is_sold, is_archived, created_at, updated_at
            FROM products
            WHERE store_id = $1
              AND ($2::BOOLEAN IS NULL OR is_featured = $2)
            ORDER BY created_at DESC
            ",
        )
        .bind(store_id.as_uuid())
        .bind(is_featured)
        .fetch_all(self.pool)
        .await?;

        self.attach_images(&mut products).await?;
        Ok(products)
    }

    /// Get one product with its images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, store_id, name, price, description,
                   is_featured, is_sold, is_archived, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        match product {
            Some(mut p) => {
                self.attach_images(std::slice::from_mut(&mut p)).await?;
                Ok(Some(p))
            }
            None => Ok(None),
        }
    }

    /// Fetch the products referenced by a checkout, images omitted.
    ///
    /// The caller is responsible for checking that every requested id came
    /// back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_checkout(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let uuids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, store_id, name, price, description,
                   is_featured, is_sold, is_archived, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            ",
        )
        .bind(&uuids)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Mark every product on an order as sold.
    ///
    /// Idempotent: re-running for the same order changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_sold_for_order(&self, order_id: OrderId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET is_sold = TRUE, updated_at = now()
            WHERE id IN (SELECT product_id FROM order_items WHERE order_id = $1)
            ",
        )
        .bind(order_id.as_uuid())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Load and group images for a set of products.
    async fn attach_images(&self, products: &mut [Product]) -> Result<(), RepositoryError> {
        if products.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = products.iter().map(|p| p.id.as_uuid()).collect();

        let images = sqlx::query_as::<_, ProductImage>(
            r"
            SELECT id, product_id, url, position
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY position ASC, id ASC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_product: HashMap<ProductId, Vec<ProductImage>> = HashMap::new();
        for image in images {
            by_product.entry(image.product_id).or_default().push(image);
        }

        for product in products {
            product.images = by_product.remove(&product.id).unwrap_or_default();
        }

        Ok(())
    }
}
