//! Domain models for the storefront.

pub mod content;
pub mod order;
pub mod product;
pub mod user;

pub use content::{Ambassador, CarouselItem, Testimonial};
pub use order::{Order, OrderHistory, OrderHistoryItem, OrderItem};
pub use product::{Product, ProductImage};
pub use user::User;
