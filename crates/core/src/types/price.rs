//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A product or order-line price in naira.
///
/// The platform is single-currency: prices are stored as `NUMERIC` naira
/// amounts and converted to integer kobo subunits only at the payment-gateway
/// boundary. Serialized as a decimal string (for example `"2500.00"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal naira amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The naira amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price multiplied by an order-line quantity.
    #[must_use]
    pub fn line_total(&self, quantity: i32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Convert to integer kobo subunits (naira × 100) for the payment gateway.
    ///
    /// Returns `None` if the amount does not fit in an `i64`.
    #[must_use]
    pub fn to_subunits(&self) -> Option<i64> {
        (self.0 * Decimal::ONE_HUNDRED).round_dp(0).to_i64()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\u{20a6}{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn naira(s: &str) -> Price {
        Price::new(s.parse().unwrap())
    }

    #[test]
    fn test_to_subunits() {
        assert_eq!(naira("2500.00").to_subunits(), Some(250_000));
        assert_eq!(naira("1500.50").to_subunits(), Some(150_050));
        assert_eq!(Price::ZERO.to_subunits(), Some(0));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(naira("1200.00").line_total(3), naira("3600.00"));
        assert_eq!(naira("99.99").line_total(1), naira("99.99"));
    }

    #[test]
    fn test_sum() {
        let total: Price = [naira("100.00"), naira("250.50"), naira("49.50")]
            .into_iter()
            .sum();
        assert_eq!(total, naira("400.00"));
    }

    #[test]
    fn test_display() {
        assert_eq!(naira("2500").to_string(), "\u{20a6}2500.00");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&naira("2500.00")).unwrap();
        assert_eq!(json, "\"2500.00\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, naira("2500.00"));
    }
}
