//! Analytics event repository for database operations.
//!
//! Events are append-only: this repository exposes insert and range scans,
//! nothing else.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storeforge_core::{EventType, StoreId};

use super::RepositoryError;
use crate::models::AnalyticsEvent;

/// Repository for analytics event database operations.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (callers on
    /// user-facing paths swallow this; see `services::analytics::track`).
    pub async fn insert(
        &self,
        store_id: StoreId,
        event_type: EventType,
        metadata: Option<&str>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO analytics_event (store_id, event_type, metadata, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(store_id)
        .bind(event_type)
        .bind(metadata)
        .bind(ip_address)
        .bind(user_agent)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Fetch all events for a store since the given instant, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn events_since(
        &self,
        store_id: StoreId,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsEvent>, RepositoryError> {
        let events = sqlx::query_as::<_, AnalyticsEvent>(
            r"
            SELECT id, store_id, event_type, metadata, ip_address, user_agent, created_at
            FROM analytics_event
            WHERE store_id = $1 AND created_at >= $2
            ORDER BY created_at DESC
            ",
        )
        .bind(store_id)
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }
}
