//! Email lead repository for database operations.

use sqlx::PgPool;

use storeforge_core::{Email, LeadId, StoreId};

use super::RepositoryError;
use crate::models::EmailLead;

/// Repository for email lead database operations.
pub struct LeadRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepository<'a> {
    /// Create a new lead repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a lead if the (store, email) pair is new.
    ///
    /// Uses `ON CONFLICT DO NOTHING` so capture is idempotent and race-safe:
    /// concurrent captures of the same email result in exactly one row, and
    /// only the request that actually inserted gets the lead back (and thus
    /// owns the welcome-email side effect).
    ///
    /// New leads start with `welcomed = FALSE` (the column default); callers
    /// flip it via [`mark_welcomed`](Self::mark_welcomed) once the welcome
    /// email has actually gone out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_if_new(
        &self,
        store_id: StoreId,
        email: &Email,
        source: &str,
    ) -> Result<Option<EmailLead>, RepositoryError> {
        let lead = sqlx::query_as::<_, EmailLead>(
            r"
            INSERT INTO email_lead (store_id, email, source)
            VALUES ($1, $2, $3)
            ON CONFLICT (store_id, email) DO NOTHING
            RETURNING id, store_id, email, source, welcomed, created_at
            ",
        )
        .bind(store_id)
        .bind(email)
        .bind(source)
        .fetch_optional(self.pool)
        .await?;

        Ok(lead)
    }

    /// Record that the welcome email for a lead was sent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_welcomed(&self, id: LeadId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE email_lead SET welcomed = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
