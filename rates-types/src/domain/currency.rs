//! Currency domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Identifier of a currency, as assigned by the remote rate source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CurrencyId(i32);

impl CurrencyId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for CurrencyId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A currency known to the directory.
///
/// Rates are not embedded here; they live in their own table keyed by
/// `currency_id` and are fetched through the directory port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    /// Short code used as the external lookup key (e.g. "USD")
    pub abbreviation: String,
    pub name: String,
    /// Number of units the official rate is quoted for
    pub scale: i32,
}

impl Currency {
    /// Creates a validated currency record.
    ///
    /// # Validation
    /// - Abbreviation cannot be empty
    /// - Scale must be positive
    pub fn new(
        id: CurrencyId,
        abbreviation: impl Into<String>,
        name: impl Into<String>,
        scale: i32,
    ) -> Result<Self, DomainError> {
        let abbreviation = abbreviation.into();
        if abbreviation.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Currency abbreviation cannot be empty".into(),
            ));
        }
        if scale <= 0 {
            return Err(DomainError::ValidationError(format!(
                "Currency scale must be positive, got {}",
                scale
            )));
        }

        Ok(Self {
            id,
            abbreviation,
            name: name.into(),
            scale,
        })
    }

    /// Creates a currency with all fields specified (for database reconstruction).
    pub fn from_parts(id: CurrencyId, abbreviation: String, name: String, scale: i32) -> Self {
        Self {
            id,
            abbreviation,
            name,
            scale,
        }
    }
}
