//! Merchant dashboard API for Ridgeline.
//!
//! Serves the dashboard frontend: store and catalog management, order
//! processing with customer notifications, sales and revenue reporting, and
//! site content administration. Caller identity arrives as a trusted header
//! set by the fronting identity proxy.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
