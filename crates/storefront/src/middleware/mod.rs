//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, error capture)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (storefront frontend origins)
//! 4. Path normalization (trailing slashes)
//! 5. Rate limiting (governor, auth routes stricter than the rest)

pub mod rate_limit;

pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
