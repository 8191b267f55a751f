//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                    - Liveness check
//! GET  /health/ready                              - Readiness check (DB ping)
//!
//! # Auth (strict rate limit on credential routes)
//! POST /api/auth/register                         - Create customer account
//! POST /api/auth/login                            - Authenticate
//! POST /api/auth/forgot-password                  - Issue temporary password
//! POST /api/auth/update-password-from-temp        - Replace temporary password
//! PUT  /api/auth/change-password                  - Change password
//! GET  /api/auth/profile?user_id=                 - Profile + order history
//! PUT  /api/auth/profile                          - Partial profile update
//!
//! # Catalog
//! GET  /api/stores/{store_id}/products            - Products (newest first)
//! GET  /api/stores/{store_id}/products/{id}       - One product
//!
//! # Checkout
//! POST /api/stores/{store_id}/checkout            - Create order, init payment
//! POST /api/stores/{store_id}/verify-payment      - Confirm payment by reference
//!
//! # Content
//! GET  /api/content/carousel                      - Active carousel items
//! GET  /api/content/testimonials                  - Active testimonials
//! GET  /api/content/ambassadors                   - Active ambassadors
//!
//! # Uploads
//! POST /api/uploads/images                        - Proxy image to host
//!
//! # Webhooks (signature-authenticated, no rate limit)
//! POST /api/webhooks/paystack                     - Payment gateway events
//! ```

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod content;
pub mod uploads;
pub mod webhooks;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Headroom on the upload body limit for the JSON envelope around the
/// image field.
const UPLOAD_BODY_SLACK: usize = 1024;

/// Create the auth routes router.
///
/// Credential endpoints get the strict limiter; password guessing should
/// hit the limiter long before the hash loop becomes the bottleneck.
pub fn auth_routes() -> Router<AppState> {
    let credential_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(credential_routes)
        .route(
            "/update-password-from-temp",
            post(auth::update_password_from_temp),
        )
        .route("/change-password", put(auth::change_password))
        .route("/profile", get(auth::profile).put(auth::update_profile))
}

/// Create the per-store routes router (catalog reads and checkout).
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/{product_id}", get(catalog::get_product))
        .route("/checkout", post(checkout::checkout))
        .route("/verify-payment", post(checkout::verify_payment))
}

/// Create the site content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/carousel", get(content::carousel))
        .route("/testimonials", get(content::testimonials))
        .route("/ambassadors", get(content::ambassadors))
}

/// Create all routes for the storefront API.
///
/// `max_upload_bytes` bounds the upload request body (plus envelope
/// slack), so oversized images are refused before the JSON is parsed.
///
/// The gateway webhook stays outside the rate-limited group; dropping a
/// legitimate payment event costs more than absorbing noise on an
/// endpoint that authenticates every request by signature.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    let upload_body_limit =
        DefaultBodyLimit::max(max_upload_bytes.saturating_add(UPLOAD_BODY_SLACK));

    let api_routes = Router::new()
        .nest("/api/stores/{store_id}", store_routes())
        .nest("/api/content", content_routes())
        .route(
            "/api/uploads/images",
            post(uploads::upload_image).layer(upload_body_limit),
        )
        .layer(api_rate_limiter());

    Router::new()
        .merge(api_routes)
        .nest("/api/auth", auth_routes())
        .route("/api/webhooks/paystack", post(webhooks::paystack))
}
