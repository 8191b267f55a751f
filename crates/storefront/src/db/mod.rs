//! Database operations for the storefront.
//!
//! Both binaries share one `PostgreSQL` database; the storefront touches the
//! customer-facing slice of it:
//!
//! ## Tables
//!
//! - `users` - Customer accounts and password hashes
//! - `products` / `product_images` - Catalog reads
//! - `orders` / `order_items` - Checkout writes, payment updates
//! - `carousel_items` / `testimonials` / `ambassadors` - Site content reads
//!
//! # Migrations
//!
//! Migrations are stored in `migrations/` at the repository root and run via:
//! ```bash
//! cargo run -p ridgeline-cli -- migrate
//! ```

pub mod content;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use content::ContentRepository;
pub use orders::{NewOrder, NewOrderItem, OrderRepository};
pub use products::ProductRepository;
pub use users::{ProfileUpdate, UserRepository};

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
