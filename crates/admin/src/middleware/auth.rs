//! Owner identity extraction.
//!
//! The admin API sits behind an identity proxy that authenticates the
//! merchant and forwards the verified subject in a trusted header
//! (`x-owner-id` unless reconfigured). The proxy strips any inbound copy of
//! the header, so its presence is proof of authentication; this service
//! never sees credentials.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::{AppError, set_sentry_user};
use crate::models::OwnerId;
use crate::state::AppState;

/// Extractor that requires a verified owner identity on the request.
///
/// Rejects with 403 when the identity header is missing or empty.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireOwner(owner): RequireOwner,
/// ) -> impl IntoResponse {
///     format!("stores of {owner}")
/// }
/// ```
#[derive(Debug)]
pub struct RequireOwner(pub OwnerId);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(&state.config().owner_id_header)
            .ok_or(AppError::Unauthenticated)?;

        let subject = value
            .to_str()
            .map_err(|_| AppError::Unauthenticated)?
            .trim();

        if subject.is_empty() {
            return Err(AppError::Unauthenticated);
        }

        let owner = OwnerId::new(subject);
        set_sentry_user(&owner);

        Ok(Self(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, Request, StatusCode};
    use axum::response::IntoResponse;
    use secrecy::SecretString;

    use crate::config::{AdminConfig, EmailConfig};

    fn test_state() -> AppState {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().expect("valid address"),
            port: 4001,
            frontend_store_url: "https://shop.example.com".to_string(),
            frontend_dashboard_url: "https://dash.example.com".to_string(),
            owner_id_header: HeaderName::from_static("x-owner-id"),
            allowed_origins: vec!["https://dash.example.com".to_string()],
            email: EmailConfig {
                smtp_host: "smtp.example.com".to_string(),
                smtp_port: 587,
                smtp_username: "mailer".to_string(),
                smtp_password: SecretString::from("hunter2"),
                from_address: "orders@example.com".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/test")
            .expect("lazy pool");

        AppState::new(config, pool).expect("state")
    }

    #[tokio::test]
    async fn extracts_owner_from_header() {
        let state = test_state();
        let (mut parts, ()) = Request::builder()
            .header("x-owner-id", "auth0|64f1c2")
            .body(())
            .expect("request")
            .into_parts();

        let RequireOwner(owner) = RequireOwner::from_request_parts(&mut parts, &state)
            .await
            .expect("extracts");
        assert_eq!(owner.as_str(), "auth0|64f1c2");
    }

    #[tokio::test]
    async fn missing_header_is_rejected_with_403() {
        let state = test_state();
        let (mut parts, ()) = Request::builder().body(()).expect("request").into_parts();

        let rejection = RequireOwner::from_request_parts(&mut parts, &state)
            .await
            .expect_err("rejects");
        assert_eq!(rejection.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn blank_header_is_rejected() {
        let state = test_state();
        let (mut parts, ()) = Request::builder()
            .header("x-owner-id", "   ")
            .body(())
            .expect("request")
            .into_parts();

        let result = RequireOwner::from_request_parts(&mut parts, &state).await;
        assert!(result.is_err());
    }
}
