//! Site content repository: the read side served to the shop frontend.
//!
//! Only active rows are exposed here; the admin panel manages the full set.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{Ambassador, CarouselItem, Testimonial};

/// Repository for public site content.
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active carousel slides in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_carousel(&self) -> Result<Vec<CarouselItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CarouselItem>(
            r"
            SELECT id, name, display_order, is_active, created_at, updated_at
            FROM carousel_items
            WHERE is_active
            ORDER BY display_order ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Active testimonials in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_testimonials(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, Testimonial>(
            r"
            SELECT id, name, position, company, content, display_order,
                   is_active, created_at, updated_at
            FROM testimonials
            WHERE is_active
            ORDER BY display_order ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Active brand ambassadors in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_ambassadors(&self) -> Result<Vec<Ambassador>, RepositoryError> {
        let rows = sqlx::query_as::<_, Ambassador>(
            r"
            SELECT id, name, position, image_url, instagram_url, display_order,
                   is_active, created_at, updated_at
            FROM ambassadors
            WHERE is_active
            ORDER BY display_order ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
