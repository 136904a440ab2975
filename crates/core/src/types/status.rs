//! Status enums for stores, products, orders, and analytics events.
//!
//! Each enum is stored as TEXT in Postgres; the manual codec impls delegate
//! to the string form so no database-side enum types are required.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a stored status string does not match any variant.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid {kind} value: {value}")]
pub struct StatusParseError {
    /// Which enum failed to parse.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

macro_rules! text_codec {
    ($name:ident) => {
        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(s.parse()?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

/// Order payment status.
///
/// Orders are created PENDING at checkout initiation and transition to
/// COMPLETED exactly once, via the payment-provider callback. No other
/// transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

impl OrderStatus {
    /// The canonical stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(StatusParseError {
                kind: "order status",
                value: other.to_owned(),
            }),
        }
    }
}

text_codec!(OrderStatus);

/// What kind of offer a product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductKind {
    /// Downloadable goods: guides, templates, toolkits.
    Digital,
    /// Booked time: consultations, workshops, sessions.
    Service,
}

impl ProductKind {
    /// The canonical stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Digital => "DIGITAL",
            Self::Service => "SERVICE",
        }
    }

    /// The other kind.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Digital => Self::Service,
            Self::Service => Self::Digital,
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductKind {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DIGITAL" => Ok(Self::Digital),
            "SERVICE" => Ok(Self::Service),
            other => Err(StatusParseError {
                kind: "product kind",
                value: other.to_owned(),
            }),
        }
    }
}

text_codec!(ProductKind);

/// Analytics event types recorded against a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    PageView,
    CheckoutStart,
    Purchase,
    EmailCapture,
}

impl EventType {
    /// The canonical stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "PAGE_VIEW",
            Self::CheckoutStart => "CHECKOUT_START",
            Self::Purchase => "PURCHASE",
            Self::EmailCapture => "EMAIL_CAPTURE",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAGE_VIEW" => Ok(Self::PageView),
            "CHECKOUT_START" => Ok(Self::CheckoutStart),
            "PURCHASE" => Ok(Self::Purchase),
            "EMAIL_CAPTURE" => Ok(Self::EmailCapture),
            other => Err(StatusParseError {
                kind: "event type",
                value: other.to_owned(),
            }),
        }
    }
}

text_codec!(EventType);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [OrderStatus::Pending, OrderStatus::Completed] {
            assert_eq!(status.as_str().parse::<OrderStatus>().expect("parse"), status);
        }
        assert!("REFUNDED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_product_kind_roundtrip() {
        for kind in [ProductKind::Digital, ProductKind::Service] {
            assert_eq!(kind.as_str().parse::<ProductKind>().expect("parse"), kind);
        }
        assert!("PHYSICAL".parse::<ProductKind>().is_err());
    }

    #[test]
    fn test_product_kind_opposite() {
        assert_eq!(ProductKind::Digital.opposite(), ProductKind::Service);
        assert_eq!(ProductKind::Service.opposite(), ProductKind::Digital);
    }

    #[test]
    fn test_event_type_roundtrip() {
        for event in [
            EventType::PageView,
            EventType::CheckoutStart,
            EventType::Purchase,
            EventType::EmailCapture,
        ] {
            assert_eq!(event.as_str().parse::<EventType>().expect("parse"), event);
        }
        assert!("CLICK".parse::<EventType>().is_err());
    }

    #[test]
    fn test_serde_screaming_snake_case() {
        let json = serde_json::to_string(&EventType::CheckoutStart).expect("serialize");
        assert_eq!(json, "\"CHECKOUT_START\"");
        let back: EventType = serde_json::from_str("\"EMAIL_CAPTURE\"").expect("deserialize");
        assert_eq!(back, EventType::EmailCapture);
    }
}
