//! Catalog write repository.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use ridgeline_core::{Price, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{Product, ProductImage};

/// Full field set for a created or updated product.
///
/// Updates replace every field, image set included; the dashboard always
/// submits the complete form.
#[derive(Debug)]
pub struct ProductInput<'a> {
    pub name: &'a str,
    pub price: Price,
    pub description: Option<&'a str>,
    pub is_featured: bool,
    pub is_sold: bool,
    pub is_archived: bool,
    pub image_urls: &'a [String],
}

/// Repository for catalog management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product and its images in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn create(
        &self,
        store_id: StoreId,
        input: &ProductInput<'_>,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (store_id, name, price, description,
                                  is_featured, is_sold, is_archived)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, store_id, name, price, description,
                      is_featured, is_sold, is_archived, created_at, updated_at
            ",
        )
        .bind(store_id.as_uuid())
        .bind(input.name)
        .bind(input.price)
        .bind(input.description)
        .bind(input.is_featured)
        .bind(input.is_sold)
        .bind(input.is_archived)
        .fetch_one(&mut *tx)
        .await?;

        for (position, url) in input.image_urls.iter().enumerate() {
            let image = sqlx::query_as::<_, ProductImage>(
                r"
                INSERT INTO product_images (product_id, url, position)
                VALUES ($1, $2, $3)
                RETURNING id, product_id, url, position
                ",
            )
            .bind(product.id.as_uuid())
            .bind(url)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .fetch_one(&mut *tx)
            .await?;

            product.images.push(image);
        }

        tx.commit().await?;

        Ok(product)
    }

    /// Replace a product's fields and image set in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the product is not in this
    /// store. Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        store_id: StoreId,
        product_id: ProductId,
        input: &ProductInput<'_>,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET name = $3, price = $4, description = $5,
                is_featured = $6, is_sold = $7, is_archived = $8,
                updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING id, store_id, name, price, description,
                      is_featured, is_sold, is_archived, created_at, updated_at
            ",
        )
        .bind(product_id.as_uuid())
        .bind(store_id.as_uuid())
        .bind(input.name)
        .bind(input.price)
        .bind(input.description)
        .bind(input.is_featured)
        .bind(input.is_sold)
        .bind(input.is_archived)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut product) = product else {
            return Err(RepositoryError::NotFound);
        };

        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(product.id.as_uuid())
            .execute(&mut *tx)
            .await?;

        for (position, url) in input.image_urls.iter().enumerate() {
            let image = sqlx::query_as::<_, ProductImage>(
                r"
                INSERT INTO product_images (product_id, url, position)
                VALUES ($1, $2, $3)
                RETURNING id, product_id, url, position
                ",
            )
            .bind(product.id.as_uuid())
            .bind(url)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .fetch_one(&mut *tx)
            .await?;

            product.images.push(image);
        }

        tx.commit().await?;

        Ok(product)
    }

    /// List a store's products newest-first, optionally filtered by the
    /// featured flag, with images attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_store(
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

    /// One product in a store, with its images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_in_store(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, store_id, name, price, description,
                   is_featured, is_sold, is_archived, created_at, updated_at
            FROM products
            WHERE id = $1 AND store_id = $2
            ",
        )
        .bind(product_id.as_uuid())
        .bind(store_id.as_uuid())
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

    /// Delete a product; its images cascade.
    ///
    /// Returns the deleted row so the dashboard can confirm what went away.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the product is not in this
    /// store. Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_in_store(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            DELETE FROM products
            WHERE id = $1 AND store_id = $2
            RETURNING id, store_id, name, price, description,
                      is_featured, is_sold, is_archived, created_at, updated_at
            ",
        )
        .bind(product_id.as_uuid())
        .bind(store_id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
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
