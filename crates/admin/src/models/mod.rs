//! Domain models for the admin API.

pub mod content;
pub mod customer;
pub mod order;
pub mod product;
pub mod stats;
pub mod store;

pub use content::{Ambassador, CarouselItem, Testimonial};
pub use customer::Customer;
pub use order::{OrderCustomer, OrderDetail, OrderItemDetail, ProductSummary, Sale};
pub use product::{Product, ProductImage};
pub use stats::{MonthlyRevenue, StoreStats};
pub use store::{OwnerId, Store};
