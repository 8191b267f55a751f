//! Request validation behavior of the storefront API.
//!
//! Every request here is rejected before a query runs, so no database is
//! needed. The forwarded-IP header satisfies the rate limiter's key
//! extractor; each test builds a fresh router, so limiter state never
//! carries across tests.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use ridgeline_integration_tests::{TEST_MAX_UPLOAD_BYTES, lazy_pool, storefront_app};

const CLIENT_IP: &str = "203.0.113.9";

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", CLIENT_IP)
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(request: Request<Body>) -> (StatusCode, String) {
    let response = storefront_app(lazy_pool())
        .oneshot(request)
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

// ============================================================================
// Checkout validation
// ============================================================================

#[tokio::test]
async fn checkout_rejects_empty_cart() {
    let store_id = Uuid::new_v4();
    let (status, body) = send(post_json(
        &format!("/api/stores/{store_id}/checkout"),
        &json!({"items": [], "phone": "+2348012345678", "email": "ada@example.com"}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("order items are required"), "body: {body}");
}

#[tokio::test]
async fn checkout_rejects_non_positive_quantity() {
    let store_id = Uuid::new_v4();
    let (status, body) = send(post_json(
        &format!("/api/stores/{store_id}/checkout"),
        &json!({
            "items": [{"product_id": Uuid::new_v4(), "quantity": 0}],
            "phone": "+2348012345678",
            "email": "ada@example.com"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("at least 1"), "body: {body}");
}

#[tokio::test]
async fn checkout_requires_contact_details() {
    let store_id = Uuid::new_v4();
    let (status, body) = send(post_json(
        &format!("/api/stores/{store_id}/checkout"),
        &json!({
            "items": [{"product_id": Uuid::new_v4(), "quantity": 1}],
            "phone": "  ",
            "email": "ada@example.com"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("phone and email are required"), "body: {body}");
}

// ============================================================================
// Registration validation
// ============================================================================

#[tokio::test]
async fn register_requires_identity_fields() {
    let (status, body) = send(post_json(
        "/api/auth/register",
        &json!({"full_name": "", "email": "", "phone": ""}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body.contains("full_name, email, and phone are required"),
        "body: {body}"
    );
}

// ============================================================================
// Upload proxy validation
// ============================================================================

#[tokio::test]
async fn upload_rejects_empty_image() {
    let (status, body) = send(post_json("/api/uploads/images", &json!({"image": ""}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("no image data"), "body: {body}");
}

#[tokio::test]
async fn upload_caps_payload_size() {
    let oversized = "x".repeat(TEST_MAX_UPLOAD_BYTES + 1);
    let (status, _) = send(post_json(
        "/api/uploads/images",
        &json!({"image": oversized}),
    ))
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// Webhook signature handling
// ============================================================================

#[tokio::test]
async fn webhook_drops_unsigned_requests() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/paystack")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"event": "charge.success", "data": {"reference": "P-abc123"}}).to_string(),
        ))
        .expect("request");

    let (status, _) = send(request).await;

    // Unverifiable events are swallowed so forgers learn nothing
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn webhook_drops_forged_signature() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/paystack")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-paystack-signature", "deadbeef")
        .body(Body::from(
            json!({"event": "charge.success", "data": {"reference": "P-abc123"}}).to_string(),
        ))
        .expect("request");

    let (status, _) = send(request).await;

    assert_eq!(status, StatusCode::OK);
}
