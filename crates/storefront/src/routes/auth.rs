//! Customer authentication and profile handlers.
//!
//! Identity is the caller-supplied `user_id`; there is no session store.
//! The credential endpoints sit behind the strict rate limiter.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ridgeline_core::UserId;

use crate::db::{OrderRepository, ProfileUpdate, RepositoryError, UserRepository};
use crate::error::{AppError, Result, set_sentry_user};
use crate::models::{OrderHistory, User};
use crate::services::auth::{AuthService, RegisterInput};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
    pub height: Option<String>,
    pub cap_size: Option<String>,
    pub shirt_size: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated user, with a flag for accounts still on a
/// temporary password.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub requires_password_change: bool,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordFromTempRequest {
    pub user_id: UserId,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub orders: Vec<OrderHistory>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub height: Option<String>,
    pub cap_size: Option<String>,
    pub shirt_size: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new customer account.
///
/// # Errors
///
/// Returns 400 when full name, email, or phone is missing, and 409 when
/// the email is already registered.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if payload.full_name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.phone.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "full_name, email, and phone are required".to_string(),
        ));
    }

    let auth = AuthService::new(state.pool(), state.email());
    let user = auth
        .register(RegisterInput {
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
            height: payload.height,
            cap_size: payload.cap_size,
            shirt_size: payload.shirt_size,
            profile_image: payload.profile_image,
        })
        .await?;

    tracing::info!(user_id = %user.id, "customer registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticate a customer.
///
/// # Errors
///
/// Returns 401 for unknown accounts, wrong passwords, and expired
/// temporary passwords.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool(), state.email());
    let outcome = auth.login(&payload.email, &payload.password).await?;

    set_sentry_user(&outcome.user.id, Some(outcome.user.email.as_str()));
    tracing::info!(
        user_id = %outcome.user.id,
        requires_password_change = outcome.requires_password_change,
        "customer logged in"
    );

    Ok(Json(LoginResponse {
        user: outcome.user,
        requires_password_change: outcome.requires_password_change,
    }))
}

/// Issue a temporary password by email.
///
/// The response never reveals whether the address has an account.
///
/// # Errors
///
/// Returns 400 when the email field is empty.
#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".to_string()));
    }

    let auth = AuthService::new(state.pool(), state.email());
    auth.issue_temp_password(&payload.email).await?;

    Ok(Json(MessageResponse {
        message: "If an account with this email exists, a temporary password has been sent."
            .to_string(),
    }))
}

/// Replace a temporary password with a customer-chosen one.
///
/// # Errors
///
/// Returns 400 when the new password is too short and 404 for an unknown
/// user.
#[instrument(skip_all, fields(user_id = %payload.user_id))]
pub async fn update_password_from_temp(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePasswordFromTempRequest>,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool(), state.email());
    auth.update_password_from_temp(payload.user_id, &payload.new_password)
        .await?;

    tracing::info!(user_id = %payload.user_id, "temporary password replaced");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// Change a password, verifying the current one first.
///
/// # Errors
///
/// Returns 401 when the current password does not match and 400 when the
/// new password is too short.
#[instrument(skip_all, fields(user_id = %payload.user_id))]
pub async fn change_password(
    State(state): State<AppState>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool(), state.email());
    auth.change_password(
        payload.user_id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;

    tracing::info!(user_id = %payload.user_id, "password changed");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// Fetch a customer profile with their order history.
///
/// # Errors
///
/// Returns 404 for an unknown user.
#[instrument(skip(state), fields(user_id = %query.user_id))]
pub async fn profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileResponse>> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(query.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let orders = OrderRepository::new(state.pool())
        .history_for_user(query.user_id)
        .await?;

    Ok(Json(ProfileResponse { user, orders }))
}

/// Update the provided profile fields, leaving the rest unchanged.
///
/// The email address is not updatable here; it is the login identity.
///
/// # Errors
///
/// Returns 404 for an unknown user.
#[instrument(skip_all, fields(user_id = %payload.user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let users = UserRepository::new(state.pool());
    let user = users
        .update_profile(
            payload.user_id,
            &ProfileUpdate {
                full_name: payload.full_name,
                phone: payload.phone,
                height: payload.height,
                cap_size: payload.cap_size,
                shirt_size: payload.shirt_size,
                profile_image: payload.profile_image,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("user not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn login_response_flattens_user_fields() {
        let now = Utc::now();
        let response = LoginResponse {
            user: User {
                id: UserId::generate(),
                full_name: "Ada Obi".to_string(),
                email: "ada@example.com".parse().expect("valid email"),
                phone: "+2348012345678".to_string(),
                height: None,
                cap_size: None,
                shirt_size: Some("M".to_string()),
                profile_image: None,
                is_temp_password: true,
                temp_password_created_at: Some(now),
                created_at: now,
                updated_at: now,
            },
            requires_password_change: true,
        };

        let json = serde_json::to_value(&response).expect("serializes");
        assert_eq!(json["full_name"], serde_json::json!("Ada Obi"));
        assert_eq!(json["requires_password_change"], serde_json::json!(true));
        assert!(json.get("password_hash").is_none());
        assert!(json.get("user").is_none(), "user fields are flattened");
    }

    #[test]
    fn update_profile_request_tolerates_partial_bodies() {
        let body = r#"{
            "user_id": "550e8400-e29b-41d4-a716-446655440000",
            "shirt_size": "XL"
        }"#;

        let request: UpdateProfileRequest = serde_json::from_str(body).expect("parses");
        assert_eq!(request.shirt_size.as_deref(), Some("XL"));
        assert!(request.full_name.is_none());
        assert!(request.phone.is_none());
    }
}
