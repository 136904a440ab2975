//! Store row type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use storeforge_core::{Slug, StoreId};

/// A tenant's storefront: brand identity plus its catalog, orders, leads,
/// and analytics events.
///
/// Stores are created unpublished and become published exactly once via an
/// explicit publish action; there is no unpublish path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Store {
    pub id: StoreId,
    /// Anonymous-owner capability token, generated at provisioning time and
    /// returned once to the creator. Replaces any notion of a user account.
    /// Never serialized: store rows flow into public responses, and anyone
    /// holding the token can edit the store.
    #[serde(skip_serializing)]
    pub owner_token: Uuid,
    pub brand_name: String,
    pub slug: Slug,
    pub tagline: String,
    pub description: String,
    /// The free-text idea the store was generated from.
    pub raw_idea: String,
    pub hero_image: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
