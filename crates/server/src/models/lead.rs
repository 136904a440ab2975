//! Email lead row type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storeforge_core::{Email, LeadId, StoreId};

/// A captured email address, unique per (store, email) pair.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EmailLead {
    pub id: LeadId,
    pub store_id: StoreId,
    pub email: Email,
    /// Where the capture came from, e.g. `storefront`.
    pub source: String,
    /// Whether the welcome email actually went out. Starts `false`; set only
    /// after a successful send, so it stays `false` when SMTP is not
    /// configured or the send fails.
    pub welcomed: bool,
    pub created_at: DateTime<Utc>,
}
