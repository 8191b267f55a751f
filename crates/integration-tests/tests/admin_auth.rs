//! Identity and validation behavior of the admin API.
//!
//! Every request here is rejected before a query runs, so no database is
//! needed. The contract under test: a missing owner header answers 403
//! "Unauthenticated", and required-field checks answer 400 with a
//! field-specific message.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use ridgeline_integration_tests::{OWNER_HEADER, admin_app, lazy_pool};

fn request(method: Method, uri: &str, owner: Option<&str>, body: Option<&serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(owner) = owner {
        builder = builder.header(OWNER_HEADER, owner);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, String) {
    let response = admin_app(lazy_pool()).oneshot(req).await.expect("response");
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
// Owner header requirement
// ============================================================================

#[tokio::test]
async fn store_list_requires_owner_header() {
    let (status, body) = send(request(Method::GET, "/api/stores", None, None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "Unauthenticated");
}

#[tokio::test]
async fn blank_owner_header_is_rejected() {
    let (status, _) = send(request(Method::GET, "/api/stores", Some("   "), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customers_require_owner_header() {
    let (status, _) = send(request(Method::GET, "/api/customers", None, None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn content_delete_requires_owner_header() {
    let id = Uuid::new_v4();
    let (status, _) = send(request(
        Method::DELETE,
        &format!("/api/content/carousel/{id}"),
        None,
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Required-field validation
// ============================================================================

#[tokio::test]
async fn store_create_requires_name() {
    let (status, body) = send(request(
        Method::POST,
        "/api/stores",
        Some("auth0|owner-a"),
        Some(&json!({})),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Name is required"), "body: {body}");
}

#[tokio::test]
async fn product_create_reports_missing_name_first() {
    let store_id = Uuid::new_v4();
    let (status, body) = send(request(
        Method::POST,
        &format!("/api/stores/{store_id}/products"),
        Some("auth0|owner-a"),
        Some(&json!({"price": "4500.00", "images": [{"url": "https://img/a.jpg"}]})),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Name is required"), "body: {body}");
}

#[tokio::test]
async fn product_create_requires_images() {
    let store_id = Uuid::new_v4();
    let (status, body) = send(request(
        Method::POST,
        &format!("/api/stores/{store_id}/products"),
        Some("auth0|owner-a"),
        Some(&json!({"name": "Trail Tee", "price": "4500.00"})),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Images are required"), "body: {body}");
}

#[tokio::test]
async fn product_create_requires_price() {
    let store_id = Uuid::new_v4();
    let (status, body) = send(request(
        Method::POST,
        &format!("/api/stores/{store_id}/products"),
        Some("auth0|owner-a"),
        Some(&json!({"name": "Trail Tee", "images": [{"url": "https://img/a.jpg"}]})),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Price is required"), "body: {body}");
}

#[tokio::test]
async fn order_status_update_rejects_unknown_status() {
    let store_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();
    let (status, body) = send(request(
        Method::PATCH,
        &format!("/api/stores/{store_id}/orders/{order_id}"),
        Some("auth0|owner-a"),
        Some(&json!({"status": "shipped"})),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid status"), "body: {body}");
}

#[tokio::test]
async fn testimonial_create_requires_name_and_content() {
    let (status, body) = send(request(
        Method::POST,
        "/api/content/testimonials",
        Some("auth0|owner-a"),
        Some(&json!({"name": "Chidi"})),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body.contains("name and content are required"),
        "body: {body}"
    );
}

#[tokio::test]
async fn ambassador_create_requires_all_fields() {
    let (status, body) = send(request(
        Method::POST,
        "/api/content/ambassadors",
        Some("auth0|owner-a"),
        Some(&json!({"name": "Amara", "position": "Athlete"})),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body.contains("name, position, image_url, and instagram_url are required"),
        "body: {body}"
    );
}
