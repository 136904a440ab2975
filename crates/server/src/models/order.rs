//! Order and line-item row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storeforge_core::{Cents, OrderId, OrderStatus, StoreId};

/// A purchase transaction record.
///
/// Created PENDING with a placeholder customer email at checkout initiation;
/// the payment-provider callback fills in the real customer identity and
/// transitions the order to COMPLETED. No other transitions exist.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    #[sqlx(rename = "total_cents")]
    pub total: Cents,
    pub status: OrderStatus,
    /// Payment provider session reference; doubles as the idempotency key
    /// for webhook redelivery.
    pub stripe_session_id: Option<String>,
    pub stripe_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item joined with its product name, for confirmation emails.
///
/// `price` is the unit price at purchase time, decoupled from the live
/// product price.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub name: String,
    #[sqlx(rename = "price_cents")]
    pub price: Cents,
}
