//! Product row type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storeforge_core::{Cents, ProductId, ProductKind, StoreId};

/// A catalog item owned by exactly one store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub name: String,
    pub description: String,
    /// Current price in cents. Orders snapshot this at checkout time, so
    /// later edits never change historical totals.
    #[sqlx(rename = "price_cents")]
    pub price: Cents,
    pub kind: ProductKind,
    pub image_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
