//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The rate resolver depends on these traits, not concrete implementations.

mod cache;
mod directory;
mod remote;

pub use cache::RateCache;
pub use directory::CurrencyDirectory;
pub use remote::{RemoteError, RemoteRateSource};
