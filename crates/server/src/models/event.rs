//! Analytics event row type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storeforge_core::{EventId, EventType, StoreId};

/// An append-only record of a visitor action against a store.
///
/// Never mutated or deleted by the application.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AnalyticsEvent {
    pub id: EventId,
    pub store_id: StoreId,
    pub event_type: EventType,
    /// Serialized JSON payload, opaque to the server.
    pub metadata: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}
