//! Database operations for the StoreForge `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `store` - Storefronts and their brand copy
//! - `product` - Catalog items (cascade-owned by stores)
//! - `store_order` / `order_item` - Purchases with price snapshots
//! - `email_lead` - Captured emails, unique per (store, email)
//! - `analytics_event` - Append-only visitor events
//!
//! Queries are bound at runtime (no compile-time database requirement);
//! uniqueness is enforced by database constraints and surfaced as
//! [`RepositoryError::Conflict`] so callers can retry with a new identity.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p storeforge-cli -- migrate
//! ```

pub mod analytics;
pub mod leads;
pub mod orders;
pub mod products;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use leads::LeadRepository;
pub use orders::{NewOrderItem, OrderRepository, PLACEHOLDER_EMAIL};
pub use products::{ProductRepository, ProductUpdate};
pub use stores::{NewStore, StoreRepository, StoreUpdate};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug or brand name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error, translating unique-constraint violations to
/// [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
