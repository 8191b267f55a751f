//! Development data seeding.
//!
//! Creates a demo store with a small apparel catalog plus homepage content,
//! all through the admin repositories, so a fresh checkout can exercise
//! both binaries without hand-writing rows.
//!
//! ```bash
//! rl-cli seed --owner dev-owner
//! ```
//!
//! The demo store is created under `--owner`; send that value in the owner
//! header to manage it from the dashboard.

use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::info;

use ridgeline_admin::db::{
    self, ContentRepository, NewAmbassador, NewCarouselItem, NewTestimonial, ProductInput,
    ProductRepository, StoreRepository,
};
use ridgeline_admin::models::OwnerId;
use ridgeline_core::Price;

const DEMO_STORE_NAME: &str = "Ridgeline Demo Store";

/// Seed the database with a demo store, products, and homepage content.
///
/// Re-running is a no-op unless `force` is set, which deletes the existing
/// demo store (cascading its products and orders) and reseeds.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or a database write fails.
pub async fn run(owner: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let owner = OwnerId::new(owner);
    let stores = StoreRepository::new(&pool);

    let existing: Vec<_> = stores
        .list_for_owner(&owner)
        .await?
        .into_iter()
        .filter(|store| store.name == DEMO_STORE_NAME)
        .collect();

    if !existing.is_empty() {
        if !force {
            info!("Demo store already exists; rerun with --force to reseed");
            return Ok(());
        }
        for store in existing {
            stores.delete(store.id, &owner).await?;
            info!(store_id = %store.id, "Deleted existing demo store");
        }
    }

    let store = stores.create(DEMO_STORE_NAME, &owner).await?;
    info!(store_id = %store.id, "Created demo store");

    let products = ProductRepository::new(&pool);
    for (name, price, description, is_featured, urls) in demo_products() {
        products
            .create(
                store.id,
                &ProductInput {
                    name,
                    price,
                    description: Some(description),
                    is_featured,
                    is_sold: false,
                    is_archived: false,
                    image_urls: &urls,
                },
            )
            .await?;
    }
    info!("Seeded catalog");

    let content = ContentRepository::new(&pool);
    if content.list_carousel().await?.is_empty() {
        content
            .create_carousel(&NewCarouselItem {
                name: "New season drop",
                display_order: 0,
                is_active: true,
            })
            .await?;
        content
            .create_carousel(&NewCarouselItem {
                name: "Caps and beanies",
                display_order: 1,
                is_active: true,
            })
            .await?;
    }

    if content.list_testimonials().await?.is_empty() {
        content
            .create_testimonial(&NewTestimonial {
                name: "Chidi Eze",
                position: Some("Stylist"),
                company: Some("Studio Lagos"),
                content: "The fit and finish rival brands at twice the price.",
                display_order: 0,
                is_active: true,
            })
            .await?;
    }

    if content.list_ambassadors().await?.is_empty() {
        content
            .create_ambassador(&NewAmbassador {
                name: "Amara Okafor",
                position: "Track athlete",
                image_url: "https://images.ridgelineapparel.com/ambassadors/amara.jpg",
                instagram_url: "https://instagram.com/amara.runs",
                display_order: 0,
                is_active: true,
            })
            .await?;
    }
    info!("Seeded homepage content");

    info!(store_id = %store.id, "Seeding complete");
    Ok(())
}

/// Fixed demo catalog: name, price, description, featured flag, image urls.
fn demo_products() -> Vec<(&'static str, Price, &'static str, bool, Vec<String>)> {
    vec![
        (
            "Alpine Shell Jacket",
            Price::new(Decimal::new(18_500_00, 2)),
            "Waterproof three-layer shell for wet-season commutes.",
            true,
            vec![
                "https://images.ridgelineapparel.com/products/alpine-shell-front.jpg".to_string(),
                "https://images.ridgelineapparel.com/products/alpine-shell-back.jpg".to_string(),
            ],
        ),
        (
            "Trail Tee",
            Price::new(Decimal::new(4_500_00, 2)),
            "Breathable cotton-blend tee, pre-shrunk.",
            true,
            vec!["https://images.ridgelineapparel.com/products/trail-tee.jpg".to_string()],
        ),
        (
            "Summit Cap",
            Price::new(Decimal::new(3_200_00, 2)),
            "Low-profile six-panel cap with embroidered logo.",
            false,
            vec!["https://images.ridgelineapparel.com/products/summit-cap.jpg".to_string()],
        ),
        (
            "Basecamp Hoodie",
            Price::new(Decimal::new(9_800_00, 2)),
            "Heavyweight fleece hoodie with kangaroo pocket.",
            false,
            vec![
                "https://images.ridgelineapparel.com/products/basecamp-hoodie.jpg".to_string(),
            ],
        ),
    ]
}
