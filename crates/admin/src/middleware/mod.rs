//! Request middleware and extractors for the admin API.

pub mod auth;

pub use auth::RequireOwner;
