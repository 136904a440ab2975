//! Product repository for database operations.

use sqlx::PgPool;

use storeforge_core::{Cents, ProductId, StoreId};

use super::RepositoryError;
use crate::models::Product;

/// Partial update for product fields; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Cents>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

const PRODUCT_COLUMNS: &str =
    "id, store_id, name, description, price_cents, kind, image_url, active, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List a store's active products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            WHERE store_id = $1 AND active = TRUE
            ORDER BY id
            "
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// List the active products of a store matching the given IDs.
    ///
    /// Products from other stores or inactive products are silently absent
    /// from the result; the checkout layer compares counts to reject
    /// invalid selections before creating any order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_for_store(
        &self,
        store_id: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let products = sqlx::query_as::<_, Product>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            WHERE id = ANY($1) AND store_id = $2 AND active = TRUE
            ORDER BY id
            "
        ))
        .bind(&raw_ids)
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Apply a partial update to a product's editable fields.
    ///
    /// Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE product
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                image_url = COALESCE($5, image_url),
                active = COALESCE($6, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.price)
        .bind(update.image_url.as_deref())
        .bind(update.active)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }
}
