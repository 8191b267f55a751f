//! Customer account repository.

use sqlx::PgPool;

use ridgeline_core::{Email, UserId};

use super::RepositoryError;
use crate::models::User;

/// Fields for a new customer account.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a Email,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub height: Option<&'a str>,
    pub cap_size: Option<&'a str>,
    pub shirt_size: Option<&'a str>,
    pub profile_image: Option<&'a str>,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub height: Option<String>,
    pub cap_size: Option<String>,
    pub shirt_size: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(sqlx::FromRow)]
struct UserAuthRow {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

/// Repository for customer accounts.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, full_name, email, phone, height, cap_size, shirt_size,
                   profile_image, is_temp_password, temp_password_created_at,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, full_name, email, phone, height, cap_size, shirt_size,
                   profile_image, is_temp_password, temp_password_created_at,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no account exists for the address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserAuthRow>(
            r"
            SELECT id, full_name, email, phone, height, cap_size, shirt_size,
                   profile_image, is_temp_password, temp_password_created_at,
                   created_at, updated_at, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Get a user and their password hash by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash_by_id(
        &self,
        id: UserId,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserAuthRow>(
            r"
            SELECT id, full_name, email, phone, height, cap_size, shirt_size,
                   profile_image, is_temp_password, temp_password_created_at,
                   created_at, updated_at, password_hash
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Create a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (full_name, email, phone, password_hash,
                               height, cap_size, shirt_size, profile_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, full_name, email, phone, height, cap_size, shirt_size,
                      profile_image, is_temp_password, temp_password_created_at,
                      created_at, updated_at
            ",
        )
        .bind(new_user.full_name)
        .bind(new_user.email.as_str())
        .bind(new_user.phone)
        .bind(new_user.password_hash)
        .bind(new_user.height)
        .bind(new_user.cap_size)
        .bind(new_user.shirt_size)
        .bind(new_user.profile_image)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    /// Store a temporary password hash and mark the account as holding one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_temp_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2,
                is_temp_password = TRUE,
                temp_password_created_at = now(),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Replace the password hash and clear any temporary-password state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2,
                is_temp_password = FALSE,
                temp_password_created_at = NULL,
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Apply a partial profile update, returning the updated user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                height = COALESCE($4, height),
                cap_size = COALESCE($5, cap_size),
                shirt_size = COALESCE($6, shirt_size),
                profile_image = COALESCE($7, profile_image),
                updated_at = now()
            WHERE id = $1
            RETURNING id, full_name, email, phone, height, cap_size, shirt_size,
                      profile_image, is_temp_password, temp_password_created_at,
                      created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(update.full_name.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.height.as_deref())
        .bind(update.cap_size.as_deref())
        .bind(update.shirt_size.as_deref())
        .bind(update.profile_image.as_deref())
        .fetch_optional(self.pool)
        .await?;

        user.ok_or(RepositoryError::NotFound)
    }
}
