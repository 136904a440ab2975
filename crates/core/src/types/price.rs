//! Integer money amounts in the smallest currency unit.
//!
//! All prices in StoreForge are stored and computed in cents. Floating point
//! never enters money arithmetic; formatting for display is the only place a
//! fraction appears.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A money amount in cents (USD).
///
/// Wraps an `i64` so order totals cannot overflow for any realistic catalog.
///
/// ## Examples
///
/// ```
/// use storeforge_core::Cents;
///
/// let price = Cents::new(2900);
/// assert_eq!(price.display(), "$29.00");
/// assert!(price.is_positive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a raw cent count.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Get the underlying cent count.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    ///
    /// Catalog prices must satisfy this; the database enforces it with a
    /// CHECK constraint and the API layer rejects non-positive updates.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checked addition, `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Format as a dollar string, e.g. `$29.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("${}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<i64> for Cents {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<Cents> for i64 {
    fn from(cents: Cents) -> Self {
        cents.0
    }
}

impl std::iter::Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|c| c.0).sum())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cents {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cents {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(cents))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cents {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_two_decimal_places() {
        assert_eq!(Cents::new(2900).display(), "$29.00");
        assert_eq!(Cents::new(9905).display(), "$99.05");
        assert_eq!(Cents::new(100).display(), "$1.00");
        assert_eq!(Cents::new(0).display(), "$0.00");
    }

    #[test]
    fn test_is_positive() {
        assert!(Cents::new(1).is_positive());
        assert!(!Cents::ZERO.is_positive());
        assert!(!Cents::new(-100).is_positive());
    }

    #[test]
    fn test_checked_add() {
        let total = Cents::new(2900).checked_add(Cents::new(9900));
        assert_eq!(total, Some(Cents::new(12800)));
        assert_eq!(Cents::new(i64::MAX).checked_add(Cents::new(1)), None);
    }

    #[test]
    fn test_sum() {
        let total: Cents = [2900, 9900, 14900].into_iter().map(Cents::new).sum();
        assert_eq!(total, Cents::new(27700));
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Cents::new(4900)).expect("serialize");
        assert_eq!(json, "4900");
    }
}
