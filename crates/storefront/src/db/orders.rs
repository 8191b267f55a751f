//! Order repository: checkout writes, payment updates, customer history.

use sqlx::PgPool;

use ridgeline_core::{OrderId, ProductId, StoreId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderHistory, OrderHistoryItem, OrderItem};

/// A line item to record at checkout.
#[derive(Debug)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: Option<String>,
    pub gender: Option<String>,
}

/// Fields for a new order.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub store_id: StoreId,
    pub user_id: Option<UserId>,
    pub reference: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
}

/// Repository for orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and all of its line items in one transaction.
    ///
    /// Either everything lands or nothing does; there is no window where an
    /// order exists with only part of its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the reference collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_items(
        &self,
        new_order: NewOrder<'_>,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (store_id, user_id, reference, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, store_id, user_id, reference, is_paid, status,
                      phone, email, created_at, updated_at
            ",
        )
        .bind(new_order.store_id.as_uuid())
        .bind(new_order.user_id.map(|id| id.as_uuid()))
        .bind(new_order.reference)
        .bind(new_order.phone)
        .bind(new_order.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order reference already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        for item in items {
            let row = sqlx::query_as::<_, OrderItem>(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, size, gender)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, product_id, quantity, size, gender
                ",
            )
            .bind(order.id.as_uuid())
            .bind(item.product_id.as_uuid())
            .bind(item.quantity)
            .bind(item.size.as_deref())
            .bind(item.gender.as_deref())
            .fetch_one(&mut *tx)
            .await?;

            order.items.push(row);
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Delete an order; line items cascade.
    ///
    /// Used to roll back checkout when the payment gateway rejects the
    /// transaction initialization.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Mark the order with this reference as paid.
    ///
    /// Returns the order id, or `None` when no order matches. Idempotent:
    /// replays of the same reference come back with the same id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_paid_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<OrderId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r"
            UPDATE orders
            SET is_paid = TRUE, updated_at = now()
            WHERE reference = $1
            RETURNING id
            ",
        )
        .bind(reference)
        .fetch_optional(self.pool)
        .await?;

        Ok(id.map(OrderId::new))
    }

    /// A customer's order history, newest-first, with product details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn history_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderHistory>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, store_id, user_id, reference, is_paid, status,
                   phone, email, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, OrderHistoryItem>(
            r"
            SELECT oi.order_id, oi.product_id, p.name AS product_name,
                   p.price AS product_price,
                   COALESCE(
                       ARRAY_AGG(pi.url ORDER BY pi.position)
                           FILTER (WHERE pi.url IS NOT NULL),
                       '{}'
                   ) AS product_images,
                   oi.quantity, oi.size, oi.gender
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            LEFT JOIN product_images pi ON pi.product_id = p.id
            WHERE o.user_id = $1
            GROUP BY oi.id, oi.order_id, oi.product_id, p.name, p.price,
                     oi.quantity, oi.size, oi.gender
            ",
        )
        .bind(user_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        let mut history: Vec<OrderHistory> = orders
            .into_iter()
            .map(|o| OrderHistory {
                id: o.id,
                reference: o.reference,
                is_paid: o.is_paid,
                status: o.status,
                created_at: o.created_at,
                items: Vec::new(),
            })
            .collect();

        for item in items {
            if let Some(entry) = history.iter_mut().find(|h| h.id == item.order_id) {
                entry.items.push(item);
            }
        }

        Ok(history)
    }
}
