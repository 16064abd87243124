//! Type-safe price representation using decimal arithmetic.
//!
//! The embedded database has no decimal column type, so prices travel as
//! TEXT and are parsed into [`Price`] at the repository boundary. Invalid
//! stored values are a data-corruption condition there, never a panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    NotANumber,
    /// Listings cannot be free or negatively priced.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// A listing price in USD.
///
/// ```
/// use tradepost_core::Price;
///
/// let price = Price::parse("9.99").unwrap();
/// assert_eq!(price.to_string(), "$9.99");
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("free").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price from a decimal string, e.g. `"9.99"`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` for unparsable input and
    /// `PriceError::NotPositive` for zero or negative amounts.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::NotANumber)?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Canonical storage form: two fractional digits, no currency symbol.
    #[must_use]
    pub fn storage_form(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Price::parse("9.99").is_ok());
        assert!(Price::parse("0.01").is_ok());
        assert!(Price::parse(" 120 ").is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Price::parse("free"), Err(PriceError::NotANumber)));
        assert!(matches!(Price::parse(""), Err(PriceError::NotANumber)));
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert!(matches!(Price::parse("0"), Err(PriceError::NotPositive)));
        assert!(matches!(
            Price::parse("-9.99"),
            Err(PriceError::NotPositive)
        ));
    }

    #[test]
    fn test_display_and_storage_form() {
        let price = Price::parse("9.9").unwrap();
        assert_eq!(price.to_string(), "$9.90");
        assert_eq!(price.storage_form(), "9.90");
    }

    #[test]
    fn test_storage_form_roundtrips() {
        let price = Price::parse("1234.50").unwrap();
        let again = Price::parse(&price.storage_form()).unwrap();
        assert_eq!(price, again);
    }
}
