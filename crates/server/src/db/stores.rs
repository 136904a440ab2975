//! Store repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use storeforge_core::{Slug, StoreId};

use super::{RepositoryError, map_unique_violation};
use crate::models::Store;
use crate::services::ai::ProductOffer;

/// Fields to insert for a new store, fixed before the uniqueness retry loop
/// picks the final brand name and slug.
#[derive(Debug)]
pub struct NewStore<'a> {
    pub owner_token: Uuid,
    pub brand_name: &'a str,
    pub slug: &'a Slug,
    pub tagline: &'a str,
    pub description: &'a str,
    pub raw_idea: &'a str,
}

/// Partial update for store fields; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct StoreUpdate {
    pub brand_name: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub hero_image: Option<String>,
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, owner_token, brand_name, slug, tagline, description,
                   raw_idea, hero_image, published, created_at, updated_at
            FROM store
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Get a store by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, owner_token, brand_name, slug, tagline, description,
                   raw_idea, hero_image, published, created_at, updated_at
            FROM store
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Atomically create a store together with its starter products.
    ///
    /// Runs in a single transaction: either the store and every product are
    /// persisted, or nothing is. Uniqueness of slug and brand name is
    /// enforced by database constraints, not by a prior read, so concurrent
    /// creations with colliding names fail here with `Conflict` and the
    /// provisioning workflow retries with a suffixed identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or brand name is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_products(
        &self,
        new_store: &NewStore<'_>,
        offers: &[ProductOffer],
    ) -> Result<Store, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO store (owner_token, brand_name, slug, tagline, description, raw_idea)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_token, brand_name, slug, tagline, description,
                      raw_idea, hero_image, published, created_at, updated_at
            ",
        )
        .bind(new_store.owner_token)
        .bind(new_store.brand_name)
        .bind(new_store.slug)
        .bind(new_store.tagline)
        .bind(new_store.description)
        .bind(new_store.raw_idea)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "store identity"))?;

        for offer in offers {
            sqlx::query(
                r"
                INSERT INTO product (store_id, name, description, price_cents, kind)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(store.id)
            .bind(&offer.name)
            .bind(&offer.description)
            .bind(offer.price)
            .bind(offer.kind)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(store)
    }

    /// Apply a partial update to a store's editable fields.
    ///
    /// Returns `None` if the store does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a brand name update collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: StoreId,
        update: &StoreUpdate,
    ) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            UPDATE store
            SET brand_name = COALESCE($2, brand_name),
                tagline = COALESCE($3, tagline),
                description = COALESCE($4, description),
                hero_image = COALESCE($5, hero_image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_token, brand_name, slug, tagline, description,
                      raw_idea, hero_image, published, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(update.brand_name.as_deref())
        .bind(update.tagline.as_deref())
        .bind(update.description.as_deref())
        .bind(update.hero_image.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "brand name"))?;

        Ok(store)
    }

    /// Mark a store as published. One-directional: there is no unpublish.
    ///
    /// Returns `false` if the store does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn publish(&self, id: StoreId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE store
            SET published = TRUE, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
