//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the rate resolver.

mod handlers;
mod rate_limit;
mod server;

pub use rate_limit::RateLimiterState;
pub use server::HttpServer;
