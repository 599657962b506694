//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a keyed token bucket. Clients are
//! told apart by IP address.

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

/// Key for requests that arrive without connection info.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One bucket per client IP
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    /// Peers whose `X-Forwarded-For` header is believed
    trusted_proxies: Vec<IpAddr>,
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (at least 1)
    /// * `period` - Time period for the quota (non-zero)
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        // One cell replenishes every `period / requests`
        let quota = Quota::with_period(period / burst.get())
            .unwrap_or_else(|| Quota::per_minute(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
            trusted_proxies: Vec::new(),
        }
    }

    /// Believes `X-Forwarded-For` on requests whose peer is one of `proxies`.
    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = proxies;
        self
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, client: IpAddr) -> bool {
        self.limiter.check_key(&client).is_ok()
    }

    /// Drops buckets of clients that are back to a full quota.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Identifies the client: the TCP peer, or the first forwarded hop when
    /// the peer is a trusted proxy.
    fn client_ip(&self, request: &Request<Body>) -> IpAddr {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        match peer {
            Some(peer) if self.trusted_proxies.contains(&peer) => {
                forwarded_for(request).unwrap_or(peer)
            }
            Some(peer) => peer,
            None => UNKNOWN_CLIENT,
        }
    }
}

fn forwarded_for(request: &Request<Body>) -> Option<IpAddr> {
    request
        .headers()
        .get("X-Forwarded-For")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let client = limiter.client_ip(&request);

    if !limiter.check(client) {
        tracing::warn!(%client, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
