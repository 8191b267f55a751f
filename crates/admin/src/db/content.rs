//! Site content repository: carousel slides, testimonials, ambassadors.
//!
//! The dashboard sees every row, active or not; visibility filtering is a
//! storefront concern.

use sqlx::PgPool;

use ridgeline_core::{AmbassadorId, CarouselItemId, TestimonialId};

use super::RepositoryError;
use crate::models::{Ambassador, CarouselItem, Testimonial};

/// Fields for a new carousel slide.
#[derive(Debug)]
pub struct NewCarouselItem<'a> {
    pub name: &'a str,
    pub display_order: i32,
    pub is_active: bool,
}

/// Partial update for a carousel slide.
#[derive(Debug, Default)]
pub struct CarouselItemUpdate {
    pub name: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Fields for a new testimonial.
#[derive(Debug)]
pub struct NewTestimonial<'a> {
    pub name: &'a str,
    pub position: Option<&'a str>,
    pub company: Option<&'a str>,
    pub content: &'a str,
    pub display_order: i32,
    pub is_active: bool,
}

/// Partial update for a testimonial.
#[derive(Debug, Default)]
pub struct TestimonialUpdate {
    pub name: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Fields for a new ambassador.
#[derive(Debug)]
pub struct NewAmbassador<'a> {
    pub name: &'a str,
    pub position: &'a str,
    pub image_url: &'a str,
    pub instagram_url: &'a str,
    pub display_order: i32,
    pub is_active: bool,
}

/// Partial update for an ambassador.
#[derive(Debug, Default)]
pub struct AmbassadorUpdate {
    pub name: Option<String>,
    pub position: Option<String>,
    pub image_url: Option<String>,
    pub instagram_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Repository for site content management.
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Carousel
    // ========================================================================

    /// All carousel slides ordered for display.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_carousel(&self) -> Result<Vec<CarouselItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CarouselItem>(
            r"
            SELECT id, name, display_order, is_active, created_at, updated_at
            FROM carousel_items
            ORDER BY display_order ASC, created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Insert a carousel slide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_carousel(
        &self,
        new: &NewCarouselItem<'_>,
    ) -> Result<CarouselItem, RepositoryError> {
        let item = sqlx::query_as::<_, CarouselItem>(
            r"
            INSERT INTO carousel_items (name, display_order, is_active)
            VALUES ($1, $2, $3)
            RETURNING id, name, display_order, is_active, created_at, updated_at
            ",
        )
        .bind(new.name)
        .bind(new.display_order)
        .bind(new.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Apply a partial update to a carousel slide and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no slide matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_carousel(
        &self,
        id: CarouselItemId,
        update: &CarouselItemUpdate,
    ) -> Result<CarouselItem, RepositoryError> {
        let item = sqlx::query_as::<_, CarouselItem>(
            r"
            UPDATE carousel_items
            SET name = COALESCE($2, name),
                display_order = COALESCE($3, display_order),
                is_active = COALESCE($4, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, display_order, is_active, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(update.name.as_deref())
        .bind(update.display_order)
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await?;

        item.ok_or(RepositoryError::NotFound)
    }

    /// Delete a carousel slide. Deleting an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_carousel(&self, id: CarouselItemId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM carousel_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    // ========================================================================
    // Testimonials
    // ========================================================================

    /// All testimonials ordered for display.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, Testimonial>(
            r"
            SELECT id, name, position, company, content, display_order,
                   is_active, created_at, updated_at
            FROM testimonials
            ORDER BY display_order ASC, created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a testimonial.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_testimonial(
        &self,
        new: &NewTestimonial<'_>,
    ) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>(
            r"
            INSERT INTO testimonials (name, position, company, content,
                                      display_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, position, company, content, display_order,
                      is_active, created_at, updated_at
            ",
        )
        .bind(new.name)
        .bind(new.position)
        .bind(new.company)
        .bind(new.content)
        .bind(new.display_order)
        .bind(new.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a partial update to a testimonial and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no testimonial matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_testimonial(
        &self,
        id: TestimonialId,
        update: &TestimonialUpdate,
    ) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>(
            r"
            UPDATE testimonials
            SET name = COALESCE($2, name),
                position = COALESCE($3, position),
                company = COALESCE($4, company),
                content = COALESCE($5, content),
                display_order = COALESCE($6, display_order),
                is_active = COALESCE($7, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, position, company, content, display_order,
                      is_active, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(update.name.as_deref())
        .bind(update.position.as_deref())
        .bind(update.company.as_deref())
        .bind(update.content.as_deref())
        .bind(update.display_order)
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Delete a testimonial. Deleting an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_testimonial(&self, id: TestimonialId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    // ========================================================================
    // Ambassadors
    // ========================================================================

    /// All ambassadors ordered for display.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_ambassadors(&self) -> Result<Vec<Ambassador>, RepositoryError> {
        let rows = sqlx::query_as::<_, Ambassador>(
            r"
            SELECT id, name, position, image_url, instagram_url, display_order,
                   is_active, created_at, updated_at
            FROM ambassadors
            ORDER BY display_order ASC, created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert an ambassador.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_ambassador(
        &self,
        new: &NewAmbassador<'_>,
    ) -> Result<Ambassador, RepositoryError> {
        let row = sqlx::query_as::<_, Ambassador>(
            r"
            INSERT INTO ambassadors (name, position, image_url, instagram_url,
                                     display_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, position, image_url, instagram_url,
                      display_order, is_active, created_at, updated_at
            ",
        )
        .bind(new.name)
        .bind(new.position)
        .bind(new.image_url)
        .bind(new.instagram_url)
        .bind(new.display_order)
        .bind(new.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a partial update to an ambassador and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no ambassador matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_ambassador(
        &self,
        id: AmbassadorId,
        update: &AmbassadorUpdate,
    ) -> Result<Ambassador, RepositoryError> {
        let row = sqlx::query_as::<_, Ambassador>(
            r"
            UPDATE ambassadors
            SET name = COALESCE($2, name),
                position = COALESCE($3, position),
                image_url = COALESCE($4, image_url),
                instagram_url = COALESCE($5, instagram_url),
                display_order = COALESCE($6, display_order),
                is_active = COALESCE($7, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, position, image_url, instagram_url,
                      display_order, is_active, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(update.name.as_deref())
        .bind(update.position.as_deref())
        .bind(update.image_url.as_deref())
        .bind(update.instagram_url.as_deref())
        .bind(update.display_order)
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Delete an ambassador. Deleting an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_ambassador(&self, id: AmbassadorId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM ambassadors WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
