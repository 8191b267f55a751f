//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration, login, and password lifecycle
//! - `password` - PBKDF2 hashing and generated-password helpers
//! - `email` - Transactional email over SMTP
//! - `paystack` - Payment gateway client and webhook signatures
//! - `cloudinary` - Signed image uploads

pub mod auth;
pub mod cloudinary;
pub mod email;
pub mod password;
pub mod paystack;
