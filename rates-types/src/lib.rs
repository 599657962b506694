//! # Rates Types
//!
//! Domain types and port traits for the currency rate service.
//! This crate has ZERO external IO dependencies - only data structures,
//! the cache-key rule, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Currency, Rate)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{Currency, CurrencyId, Rate, RateId, cache_key};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError, ResolveError};
pub use ports::{CurrencyDirectory, RateCache, RemoteError, RemoteRateSource};
