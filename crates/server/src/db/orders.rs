//! Order repository for database operations.

use sqlx::PgPool;

use storeforge_core::{Cents, OrderId, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{Order, OrderItemDetail};

/// Placeholder customer identity used until the payment callback fills in
/// the real one.
pub const PLACEHOLDER_EMAIL: &str = "pending@checkout.invalid";

const ORDER_COLUMNS: &str = "id, store_id, customer_email, customer_name, total_cents, status, \
     stripe_session_id, stripe_payment_id, created_at, updated_at";

/// A line item to snapshot into a new pending order.
#[derive(Debug, Clone, Copy)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price at checkout time; frozen for the life of the order.
    pub price: Cents,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM store_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Create a PENDING order with its snapshot line items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails (in which case
    /// nothing is persisted).
    pub async fn create_pending(
        &self,
        store_id: StoreId,
        total: Cents,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO store_order (store_id, customer_email, total_cents, status)
            VALUES ($1, $2, $3, 'PENDING')
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(store_id)
        .bind(PLACEHOLDER_EMAIL)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_item (order_id, product_id, quantity, price_cents)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Attach the payment session reference to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_session_id(
        &self,
        id: OrderId,
        session_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE store_order
            SET stripe_session_id = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(session_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an order (and its line items, via cascade).
    ///
    /// Used to roll back a pending order whose payment session could not be
    /// created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM store_order WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Conditionally transition an order from PENDING to COMPLETED, filling
    /// in the real customer identity and payment reference.
    ///
    /// Returns `None` when the order is not PENDING (already completed, or
    /// absent). The status guard makes webhook redelivery idempotent: only
    /// the first delivery gets the order back and triggers side effects.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn complete(
        &self,
        id: OrderId,
        customer_email: &str,
        customer_name: Option<&str>,
        payment_id: Option<&str>,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            UPDATE store_order
            SET status = 'COMPLETED',
                customer_email = $2,
                customer_name = COALESCE($3, customer_name),
                stripe_payment_id = COALESCE($4, stripe_payment_id),
                updated_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(customer_email)
        .bind(customer_name)
        .bind(payment_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Fetch an order's line items joined with their product names.
    ///
    /// Prices come from the order snapshot, not the live product rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_details(
        &self,
        id: OrderId,
    ) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            r"
            SELECT p.name, i.price_cents
            FROM order_item i
            JOIN product p ON p.id = i.product_id
            WHERE i.order_id = $1
            ORDER BY i.id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
