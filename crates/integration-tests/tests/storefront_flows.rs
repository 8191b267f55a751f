//! End-to-end storefront API flows against a real database.
//!
//! All tests are `#[ignore]`d; they need a migrated `PostgreSQL` at
//! `TEST_DATABASE_URL`. Catalog fixtures are written through the admin
//! repositories. Checkout coverage stops at product validation; the happy
//! path calls the payment gateway and stays out.
//!
//! ```bash
//! cargo run -p ridgeline-cli -- migrate
//! cargo test -p ridgeline-integration-tests -- --ignored
//! ```

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use ridgeline_admin::db::{NewCarouselItem, ProductInput, StoreRepository};
use ridgeline_admin::models::OwnerId;
use ridgeline_core::Price;
use ridgeline_integration_tests::{storefront_app, test_pool};

const CLIENT_IP: &str = "203.0.113.77";

fn request(method: Method, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(pool: &PgPool, req: Request<Body>) -> (StatusCode, String) {
    let response = storefront_app(pool.clone())
        .oneshot(req)
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

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

fn unique_email() -> String {
    format!("shopper-{}@example.com", Uuid::new_v4().simple())
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
#[ignore = "requires a migrated database at TEST_DATABASE_URL"]
async fn register_login_and_update_profile() {
    let pool = test_pool().await;
    let email = unique_email();

    let (status, body) = send(
        &pool,
        request(
            Method::POST,
            "/api/auth/register",
            Some(&json!({
                "full_name": "Ada Obi",
                "email": email,
                "phone": "+2348012345678",
                "password": "correct horse battery staple"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    let user = parse(&body);
    assert_eq!(user["full_name"], "Ada Obi");
    assert!(user.get("password_hash").is_none());
    let user_id = user["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &pool,
        request(
            Method::POST,
            "/api/auth/login",
            Some(&json!({"email": email, "password": "wrong password"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &pool,
        request(
            Method::POST,
            "/api/auth/login",
            Some(&json!({"email": email, "password": "correct horse battery staple"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let (status, body) = send(
        &pool,
        request(
            Method::PUT,
            "/api/auth/profile",
            Some(&json!({"user_id": user_id, "shirt_size": "XL"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(parse(&body)["shirt_size"], "XL");

    let (status, body) = send(
        &pool,
        request(
            Method::GET,
            &format!("/api/auth/profile?user_id={user_id}"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let profile = parse(&body);
    assert_eq!(profile["user"]["shirt_size"], "XL");
    assert_eq!(profile["orders"], json!([]));
}

#[tokio::test]
#[ignore = "requires a migrated database at TEST_DATABASE_URL"]
async fn duplicate_registration_conflicts() {
    let pool = test_pool().await;
    let email = unique_email();
    let payload = json!({
        "full_name": "Ada Obi",
        "email": email,
        "phone": "+2348012345678",
        "password": "correct horse battery staple"
    });

    let (status, _) = send(
        &pool,
        request(Method::POST, "/api/auth/register", Some(&payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &pool,
        request(Method::POST, "/api/auth/register", Some(&payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ============================================================================
// Catalog and content reads
// ============================================================================

#[tokio::test]
#[ignore = "requires a migrated database at TEST_DATABASE_URL"]
async fn catalog_reads_are_scoped_to_the_store() {
    let pool = test_pool().await;
    let owner = OwnerId::new(format!("itest|{}", Uuid::new_v4()));

    let stores = StoreRepository::new(&pool);
    let store = stores.create("Read Test", &owner).await.expect("store");
    let other = stores.create("Other Store", &owner).await.expect("store");

    let products = ridgeline_admin::db::ProductRepository::new(&pool);
    let urls = vec!["https://img/tee.jpg".to_string()];
    let product = products
        .create(
            store.id,
            &ProductInput {
                name: "Trail Tee",
                price: Price::new(Decimal::new(4_500_00, 2)),
                description: Some("Breathable tee"),
                is_featured: true,
                is_sold: false,
                is_archived: false,
                image_urls: &urls,
            },
        )
        .await
        .expect("product");

    let (status, body) = send(
        &pool,
        request(
            Method::GET,
            &format!("/api/stores/{}/products", store.id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = parse(&body);
    assert_eq!(listed.as_array().expect("array").len(), 1);
    assert_eq!(listed[0]["price"], "4500.00");
    assert_eq!(listed[0]["images"][0]["url"], "https://img/tee.jpg");

    // The same product through the other store's URL is not found
    let (status, _) = send(
        &pool,
        request(
            Method::GET,
            &format!("/api/stores/{}/products/{}", other.id, product.id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a migrated database at TEST_DATABASE_URL"]
async fn carousel_read_hides_inactive_rows() {
    let pool = test_pool().await;

    let content = ridgeline_admin::db::ContentRepository::new(&pool);
    let active = content
        .create_carousel(&NewCarouselItem {
            name: "Visible slide",
            display_order: 0,
            is_active: true,
        })
        .await
        .expect("carousel");
    let hidden = content
        .create_carousel(&NewCarouselItem {
            name: "Hidden slide",
            display_order: 1,
            is_active: false,
        })
        .await
        .expect("carousel");

    let (status, body) = send(&pool, request(Method::GET, "/api/content/carousel", None)).await;
    assert_eq!(status, StatusCode::OK);
    let listed = parse(&body);
    let items = listed.as_array().expect("array");
    let has = |id: String| items.iter().any(|item| item["id"].as_str() == Some(id.as_str()));

    assert!(has(active.id.to_string()));
    assert!(!has(hidden.id.to_string()));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "requires a migrated database at TEST_DATABASE_URL"]
async fn checkout_with_unknown_product_is_not_found() {
    let pool = test_pool().await;

    // Product lookup precedes order creation and the gateway call, so no
    // order row is left behind and no outbound request is made.
    let (status, body) = send(
        &pool,
        request(
            Method::POST,
            &format!("/api/stores/{}/checkout", Uuid::new_v4()),
            Some(&json!({
                "items": [{ "product_id": Uuid::new_v4(), "quantity": 1 }],
                "phone": "+2348012345678",
                "email": "ghost-cart@example.com"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND, "body: {body}");
    assert!(body.contains("products not found"));
}
