//! Rate limiting for the sign-in and sign-up actions.
//!
//! Uses governor via `tower_governor`, keyed by client IP (~10 requests per
//! minute with a burst of 5).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that buckets requests by client IP.
///
/// The peer address is used unless `trust_proxy_headers` is set, since any
/// client can send `X-Forwarded-For`. Requests with no usable address (e.g.
/// in-process tests without `ConnectInfo`) share one bucket under `0.0.0.0`
/// rather than bypassing the limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req, self.trust_proxy_headers))
    }
}

/// Best-effort client IP for a request.
///
/// With `trust_proxy_headers`, checks Cloudflare's `CF-Connecting-IP`, then
/// the first `X-Forwarded-For` hop, `X-Real-IP` and Fly.io's
/// `Fly-Client-IP` before the peer address. Otherwise only the peer address
/// counts.
pub fn client_ip<T>(req: &Request<T>, trust_proxy_headers: bool) -> IpAddr {
    let peer = || {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    };

    let forwarded = if trust_proxy_headers {
        forwarded_ip(req)
    } else {
        None
    };

    forwarded
        .or_else(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
    let forwarded_for = || {
        req.headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    parse_header_ip(req, "cf-connecting-ip")
        .or_else(forwarded_for)
        .or_else(|| parse_header_ip(req, "x-real-ip"))
        .or_else(|| parse_header_ip(req, "fly-client-ip"))
}

fn parse_header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth actions: ~10 requests per minute per IP.
///
/// See [`ClientIpKeyExtractor`] for how `trust_proxy_headers` picks the IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(6) // Replenish 1 token every 6 seconds (~10/minute)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}
