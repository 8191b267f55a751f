//! Public storefront API for Ridgeline.
//!
//! Serves the shop frontend: catalog and content reads, checkout against the
//! payment gateway, the payment webhook, customer authentication, and profile
//! image uploads.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
