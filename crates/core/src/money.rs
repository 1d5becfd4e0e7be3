//! Monetary value object.
//!
//! Prices are stored as an integer amount in the currency's minor unit plus a
//! currency code. Display strings like `"2500 FC"` are derived at the
//! presentation boundary, never stored as the source of truth.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Currency code (e.g. `"FC"`, `"USD"`).
///
/// Codes are opaque at this layer; 1–8 ASCII letters, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl AsRef<str>) -> DomainResult<Self> {
        let code = code.as_ref().trim();
        if code.is_empty() || code.len() > 8 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(format!(
                "invalid currency code: {code:?}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount of money in a single currency.
///
/// The amount is in the currency's smallest unit and never negative; carts and
/// catalogs have no concept of debt. Arithmetic is checked: overflow and
/// cross-currency addition are explicit [`DomainError`]s, never silent wraps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount_minor: u64,
    currency: Currency,
}

impl ValueObject for Money {}

impl Money {
    pub fn new(amount_minor: u64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn amount_minor(&self) -> u64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Parse a display-formatted price token such as `"2500 FC"`.
    ///
    /// Upstream catalogs format prices as `"<amount> <code>"`. Anything else
    /// (missing code, non-numeric amount, negative, overflow) is a validation
    /// error — malformed input is rejected, not coerced.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let mut parts = s.split_whitespace();
        let (amount, code) = match (parts.next(), parts.next(), parts.next()) {
            (Some(amount), Some(code), None) => (amount, code),
            _ => {
                return Err(DomainError::validation(format!(
                    "malformed price token: {s:?} (expected \"<amount> <currency>\")"
                )));
            }
        };

        let amount_minor: u64 = amount.parse().map_err(|_| {
            DomainError::validation(format!("malformed price amount: {amount:?}"))
        })?;

        Ok(Self::new(amount_minor, Currency::new(code)?))
    }

    /// Multiply by a quantity, failing on overflow.
    pub fn checked_mul(&self, quantity: u64) -> DomainResult<Self> {
        let amount = self
            .amount_minor
            .checked_mul(quantity)
            .ok_or_else(|| DomainError::validation("price multiplication overflow"))?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    /// Add another amount of the same currency, failing on mismatch/overflow.
    pub fn checked_add(&self, other: &Money) -> DomainResult<Self> {
        if self.currency != other.currency {
            return Err(DomainError::validation(format!(
                "currency mismatch: {} vs {}",
                self.currency, other.currency
            )));
        }
        let amount = self
            .amount_minor
            .checked_add(other.amount_minor)
            .ok_or_else(|| DomainError::validation("price addition overflow"))?;
        Ok(Self::new(amount, self.currency.clone()))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount_minor, self.currency)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
