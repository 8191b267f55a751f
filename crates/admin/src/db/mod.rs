//! Database operations for the admin API.
//!
//! Both binaries share one `PostgreSQL` database; the admin side touches the
//! merchant-facing slice of it:
//!
//! ## Tables
//!
//! - `stores` - Store ownership and naming
//! - `products` / `product_images` - Catalog writes
//! - `orders` / `order_items` - Order processing and reporting
//! - `users` - Customer directory (read-only here)
//! - `carousel_items` / `testimonials` / `ambassadors` - Site content writes
//!
//! # Migrations
//!
//! Migrations are stored in `migrations/` at the repository root and run via:
//! ```bash
//! cargo run -p ridgeline-cli -- migrate
//! ```

pub mod content;
pub mod customers;
pub mod orders;
pub mod products;
pub mod stats;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use content::{
    AmbassadorUpdate, CarouselItemUpdate, ContentRepository, NewAmbassador, NewCarouselItem,
    NewTestimonial, TestimonialUpdate,
};
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use products::{ProductInput, ProductRepository};
pub use stats::StatsRepository;
pub use stores::StoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
