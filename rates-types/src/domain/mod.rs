//! Domain models for the rate service.

pub mod currency;
pub mod rate;

pub use currency::{Currency, CurrencyId};
pub use rate::{Rate, RateId, cache_key};
