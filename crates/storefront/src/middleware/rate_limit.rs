//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Two tiers: a strict limiter for credential endpoints and a relaxed one
//! for the rest of the API.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that reads the real client IP from proxy headers.
///
/// The app runs behind Fly's proxy, so `Fly-Client-IP` wins; the standard
/// forwarding headers cover local reverse-proxy setups.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        if let Some(ip) = headers
            .get("fly-client-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // First hop in the chain is the client
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        Err(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Limiter for credential endpoints: ~10 requests per minute per IP.
///
/// One token every 6 seconds, burst of 5. Slows down password guessing on
/// login and temp-password requests.
///
/// # Panics
///
/// Will not panic: `per_second(6)` and `burst_size(5)` are valid
/// `GovernorConfigBuilder` inputs.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Limiter for the general API: ~60 sustained requests per minute per IP.
///
/// One token per second, burst of 50. Wide enough for a browsing session,
/// tight enough to blunt scripted checkout abuse.
///
/// # Panics
///
/// Will not panic: `per_second(1)` and `burst_size(50)` are valid
/// `GovernorConfigBuilder` inputs.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(1)
        .burst_size(50)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(50) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_governor::key_extractor::KeyExtractor;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/auth/login");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("valid request")
    }

    #[test]
    fn fly_header_wins_over_forwarded_chain() {
        let req = request_with_headers(&[
            ("fly-client-ip", "203.0.113.9"),
            ("x-forwarded-for", "198.51.100.1, 10.0.0.1"),
        ]);

        let key = ClientIpKeyExtractor.extract(&req).expect("extracts");
        assert_eq!(key, "203.0.113.9".parse::<IpAddr>().expect("valid ip"));
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let req = request_with_headers(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1, 10.0.0.2")]);

        let key = ClientIpKeyExtractor.extract(&req).expect("extracts");
        assert_eq!(key, "198.51.100.1".parse::<IpAddr>().expect("valid ip"));
    }

    #[test]
    fn missing_headers_fail_extraction() {
        let req = request_with_headers(&[]);
        assert!(ClientIpKeyExtractor.extract(&req).is_err());
    }
}
