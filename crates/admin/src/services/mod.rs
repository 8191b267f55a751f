//! Merchant-side services.
//!
//! # Services
//!
//! - `email` - Customer notifications triggered from the dashboard

pub mod email;

pub use email::EmailService;
