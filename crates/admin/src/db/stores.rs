//! Store repository.

use sqlx::PgPool;

use ridgeline_core::StoreId;

use super::RepositoryError;
use crate::models::{OwnerId, Store};

/// Repository for stores.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, name: &str, owner: &OwnerId) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(owner.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(store)
    }

    /// All stores owned by the caller, newest-first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(
            r"
            SELECT id, name, owner_id, created_at, updated_at
            FROM stores
            WHERE owner_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(owner.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(stores)
    }

    /// One store, only if the caller owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        id: StoreId,
        owner: &OwnerId,
    ) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, name, owner_id, created_at, updated_at
            FROM stores
            WHERE id = $1 AND owner_id = $2
            ",
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Whether the caller owns this store.
    ///
    /// A missing store reads as not owned; the caller cannot distinguish the
    /// two, which keeps other merchants' store ids unprobeable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_owned_by(
        &self,
        id: StoreId,
        owner: &OwnerId,
    ) -> Result<bool, RepositoryError> {
        let found = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM stores WHERE id = $1 AND owner_id = $2",
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Rename a store the caller owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no owned store matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn rename(
        &self,
        id: StoreId,
        owner: &OwnerId,
        name: &str,
    ) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            UPDATE stores
            SET name = $3, updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, name, owner_id, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        store.ok_or(RepositoryError::NotFound)
    }

    /// Delete a store the caller owns; products and orders cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no owned store matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: StoreId, owner: &OwnerId) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            DELETE FROM stores
            WHERE id = $1 AND owner_id = $2
            RETURNING id, name, owner_id, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(self.pool)
        .await?;

        store.ok_or(RepositoryError::NotFound)
    }
}
