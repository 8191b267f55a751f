//! HTTP route handlers for the admin API.
//!
//! Every route below requires the verified owner header (403 without it);
//! store-scoped routes additionally check ownership of `{store_id}` and
//! answer 405 when it belongs to someone else.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                      - Liveness check
//! GET    /health/ready                                - Readiness check (DB ping)
//!
//! # Stores
//! POST   /api/stores                                  - Create store
//! GET    /api/stores                                  - Caller's stores
//! GET    /api/stores/{store_id}                       - One store (404)
//! PATCH  /api/stores/{store_id}                       - Rename store
//! DELETE /api/stores/{store_id}                       - Delete store (cascades)
//!
//! # Products
//! POST   /api/stores/{store_id}/products              - Create product + images
//! GET    /api/stores/{store_id}/products              - Products (newest first)
//! GET    /api/stores/{store_id}/products/{id}         - One product
//! PATCH  /api/stores/{store_id}/products/{id}         - Full update, replace images
//! DELETE /api/stores/{store_id}/products/{id}         - Delete product
//!
//! # Orders
//! GET    /api/stores/{store_id}/orders                - Orders + customer + items
//! GET    /api/stores/{store_id}/orders/{id}           - One order
//! PATCH  /api/stores/{store_id}/orders/{id}           - Update status, notify customer
//! GET    /api/stores/{store_id}/sales                 - Paid orders with totals
//! GET    /api/stores/{store_id}/stats                 - Revenue, counts, monthly graph
//!
//! # Content
//! GET    /api/content/{kind}                          - All rows, active or not
//! POST   /api/content/{kind}                          - Create row (201)
//! PUT    /api/content/{kind}/{id}                     - Partial update
//! DELETE /api/content/{kind}/{id}                     - Delete row (204)
//!   where {kind} is carousel | testimonials | ambassadors
//!
//! # Customers
//! GET    /api/customers                               - All storefront customers
//! GET    /api/customers/{user_id}                     - One customer + order history
//! ```

pub mod content;
pub mod customers;
pub mod orders;
pub mod products;
pub mod stats;
pub mod stores;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use ridgeline_core::StoreId;

use crate::db::StoreRepository;
use crate::error::{AppError, Result};
use crate::models::OwnerId;
use crate::state::AppState;

/// Reject with 405 unless `store_id` belongs to `owner`.
///
/// A store that does not exist fails the same way as one owned by another
/// merchant, so store ids cannot be probed through this API.
pub(crate) async fn ensure_store_owner(
    state: &AppState,
    store_id: StoreId,
    owner: &OwnerId,
) -> Result<()> {
    let owned = StoreRepository::new(state.pool())
        .is_owned_by(store_id, owner)
        .await?;

    if owned { Ok(()) } else { Err(AppError::NotOwner) }
}

/// Create the store routes router, products/orders/sales/stats nested below.
pub fn store_routes() -> Router<AppState> {
    let scoped = Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/products/{product_id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders", get(orders::list_orders))
        .route(
            "/orders/{order_id}",
            get(orders::get_order).patch(orders::update_order_status),
        )
        .route("/sales", get(orders::list_sales))
        .route("/stats", get(stats::store_stats));

    Router::new()
        .route("/", post(stores::create_store).get(stores::list_stores))
        .route(
            "/{store_id}",
            get(stores::get_store)
                .patch(stores::rename_store)
                .delete(stores::delete_store),
        )
        .nest("/{store_id}", scoped)
}

/// Create the site content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/carousel",
            get(content::list_carousel).post(content::create_carousel),
        )
        .route(
            "/carousel/{id}",
            put(content::update_carousel).delete(content::delete_carousel),
        )
        .route(
            "/testimonials",
            get(content::list_testimonials).post(content::create_testimonial),
        )
        .route(
            "/testimonials/{id}",
            put(content::update_testimonial).delete(content::delete_testimonial),
        )
        .route(
            "/ambassadors",
            get(content::list_ambassadors).post(content::create_ambassador),
        )
        .route(
            "/ambassadors/{id}",
            put(content::update_ambassador).delete(content::delete_ambassador),
        )
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list_customers))
        .route("/{user_id}", get(customers::get_customer))
}

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/stores", store_routes())
        .nest("/api/content", content_routes())
        .nest("/api/customers", customer_routes())
}
