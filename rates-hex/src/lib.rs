//! # Rates Hex
//!
//! Application service layer and HTTP adapter for the rate service.
//!
//! ## Architecture
//!
//! - `service/` - Rate resolver (cache, then directory, then remote source)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The resolver is generic over the `CurrencyDirectory`, `RateCache` and
//! `RemoteRateSource` ports, allowing different adapters to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::RateResolver;
