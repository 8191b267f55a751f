//! Customer authentication service.
//!
//! Registration, login, and the password lifecycle (temporary passwords,
//! resets, changes). Identity on later requests is the caller-supplied user
//! id; there is no session store.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use ridgeline_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;
use crate::services::email::{EmailError, EmailService};
use crate::services::password::{
    generate_account_password, generate_temp_password, hash_password, verify_password,
};

/// Minimum length for customer-chosen passwords.
const MIN_PASSWORD_LENGTH: usize = 6;

/// How long a temporary password stays usable.
const TEMP_PASSWORD_TTL_HOURS: i64 = 24;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ridgeline_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Current password didn't match during a password change.
    #[error("invalid current password")]
    InvalidCurrentPassword,

    /// Temporary password is older than its validity window.
    #[error("temporary password expired")]
    TempPasswordExpired,

    /// Email already registered.
    #[error("email already registered")]
    EmailTaken,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    Hash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Email delivery error.
    #[error("email delivery error: {0}")]
    Email(#[from] EmailError),
}

/// Fields accepted at registration.
#[derive(Debug)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
    pub height: Option<String>,
    pub cap_size: Option<String>,
    pub shirt_size: Option<String>,
    pub profile_image: Option<String>,
}

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    /// True while the account is on a live temporary password.
    pub requires_password_change: bool,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    email: &'a EmailService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, email: &'a EmailService) -> Self {
        Self {
            users: UserRepository::new(pool),
            email,
        }
    }

    /// Register a new customer.
    ///
    /// When no password is supplied, one is generated and emailed in the
    /// welcome message.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let email = Email::parse(&input.email)?;

        let (password, generated) = match input.password {
            Some(p) if !p.is_empty() => (p, false),
            _ => (generate_account_password(), true),
        };

        let password_hash = hash_password(&password).map_err(|e| AuthError::Hash(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                full_name: &input.full_name,
                email: &email,
                phone: &input.phone,
                password_hash: &password_hash,
                height: input.height.as_deref(),
                cap_size: input.cap_size.as_deref(),
                shirt_size: input.shirt_size.as_deref(),
                profile_image: input.profile_image.as_deref(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        // The user row is already committed; a failed welcome email must not
        // unwind registration. A generated password can be recovered through
        // the forgot-password flow.
        if let Err(e) = self
            .email
            .send_welcome(
                user.email.as_str(),
                &user.full_name,
                generated.then_some(password.as_str()),
            )
            .await
        {
            tracing::error!(error = %e, "welcome email failed after registration");
        }

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::TempPasswordExpired` if the account holds a
    /// temporary password past its window.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        // A malformed address can't match an account; same answer as a wrong
        // password so login never confirms address validity
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash).map_err(|_| AuthError::InvalidCredentials)?;

        if temp_password_expired(&user, Utc::now()) {
            return Err(AuthError::TempPasswordExpired);
        }

        let requires_password_change = user.is_temp_password;

        Ok(LoginOutcome {
            user,
            requires_password_change,
        })
    }

    /// Issue a temporary password for the account behind this email.
    ///
    /// Silently succeeds when no account exists (or the address doesn't
    /// parse), so callers can't probe for registered addresses.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Email` if the notification cannot be sent.
    pub async fn issue_temp_password(&self, email: &str) -> Result<(), AuthError> {
        // Unparseable and unknown addresses get the same silent success
        let Ok(email) = Email::parse(email) else {
            tracing::debug!("password reset requested for invalid address");
            return Ok(());
        };

        let Some(user) = self.users.get_by_email(&email).await? else {
            tracing::debug!("password reset requested for unknown address");
            return Ok(());
        };

        let temp_password = generate_temp_password();
        let password_hash =
            hash_password(&temp_password).map_err(|e| AuthError::Hash(e.to_string()))?;

        self.users.set_temp_password(user.id, &password_hash).await?;

        self.email
            .send_temp_password(user.email.as_str(), &user.full_name, &temp_password)
            .await?;

        Ok(())
    }

    /// Replace a temporary password with a customer-chosen one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the new password is too short.
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_password_from_temp(
        &self,
        user_id: UserId,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let password_hash =
            hash_password(new_password).map_err(|e| AuthError::Hash(e.to_string()))?;

        self.users
            .update_password(user_id, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Change a password, verifying the current one first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCurrentPassword` if verification fails.
    /// Returns `AuthError::WeakPassword` if the new password is too short.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, password_hash) = self
            .users
            .get_with_password_hash_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(current_password, &password_hash)
            .map_err(|_| AuthError::InvalidCurrentPassword)?;

        validate_password(new_password)?;

        let new_hash = hash_password(new_password).map_err(|e| AuthError::Hash(e.to_string()))?;

        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    Ok(())
}

/// Whether the account's temporary password has aged out.
fn temp_password_expired(user: &User, now: DateTime<Utc>) -> bool {
    user.is_temp_password
        && user.temp_password_created_at.is_some_and(|created| {
            now.signed_duration_since(created) > Duration::hours(TEMP_PASSWORD_TTL_HOURS)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_user(is_temp: bool, created_hours_ago: Option<i64>) -> User {
        let now = Utc::now();
        User {
            id: UserId::generate(),
            full_name: "Ada Obi".to_string(),
            email: "ada@example.com".parse().expect("valid email"),
            phone: "+2348012345678".to_string(),
            height: None,
            cap_size: None,
            shirt_size: None,
            profile_image: None,
            is_temp_password: is_temp,
            temp_password_created_at: created_hours_ago.map(|h| now - Duration::hours(h)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn short_password_is_rejected_with_message() {
        let err = validate_password("12345").expect_err("too short");
        assert!(matches!(err, AuthError::WeakPassword(_)));
        assert_eq!(
            err.to_string(),
            "password validation failed: Password must be at least 6 characters long"
        );
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn fresh_temp_password_is_not_expired() {
        let user = fixture_user(true, Some(23));
        assert!(!temp_password_expired(&user, Utc::now()));
    }

    #[test]
    fn day_old_temp_password_is_expired() {
        let user = fixture_user(true, Some(25));
        assert!(temp_password_expired(&user, Utc::now()));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let mut user = fixture_user(true, None);
        user.temp_password_created_at = Some(now - Duration::hours(24));
        assert!(!temp_password_expired(&user, now));

        user.temp_password_created_at = Some(now - Duration::hours(24) - Duration::seconds(1));
        assert!(temp_password_expired(&user, now));
    }

    #[test]
    fn regular_password_never_expires() {
        let user = fixture_user(false, Some(1000));
        assert!(!temp_password_expired(&user, Utc::now()));
    }
}
