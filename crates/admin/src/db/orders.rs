//! Order repository: dashboard listings, status updates, sales reporting.

use sqlx::PgPool;
use uuid::Uuid;

use chrono::{DateTime, Utc};
use ridgeline_core::{
    Email, OrderId, OrderItemId, OrderStatus, Price, ProductId, StoreId, UserId,
};

use super::RepositoryError;
use crate::models::{OrderCustomer, OrderDetail, OrderItemDetail, ProductSummary, Sale};

/// One order row joined with its customer, items still to be attached.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    reference: String,
    is_paid: bool,
    status: OrderStatus,
    phone: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    customer_id: Option<UserId>,
    customer_name: Option<String>,
    customer_email: Option<Email>,
    customer_phone: Option<String>,
}

impl OrderRow {
    fn into_detail(self) -> OrderDetail {
        let customer = match (
            self.customer_id,
            self.customer_name,
            self.customer_email,
            self.customer_phone,
        ) {
            (Some(id), Some(full_name), Some(email), Some(phone)) => Some(OrderCustomer {
                id,
                full_name,
                email,
                phone,
            }),
            _ => None,
        };

        OrderDetail {
            id: self.id,
            reference: self.reference,
            is_paid: self.is_paid,
            status: self.status,
            phone: self.phone,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
            customer,
            items: Vec::new(),
        }
    }
}

/// One line item joined with its product and image urls.
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: OrderItemId,
    order_id: OrderId,
    quantity: i32,
    size: Option<String>,
    gender: Option<String>,
    product_id: ProductId,
    product_name: String,
    product_price: Price,
    product_images: Vec<String>,
}

impl ItemRow {
    fn into_detail(self) -> (OrderId, OrderItemDetail) {
        (
            self.order_id,
            OrderItemDetail {
                id: self.id,
                quantity: self.quantity,
                size: self.size,
                gender: self.gender,
                product: ProductSummary {
                    id: self.product_id,
                    name: self.product_name,
                    price: self.product_price,
                    images: self.product_images,
                },
            },
        )
    }
}

const ORDER_SELECT: &str = r"
    SELECT o.id, o.reference, o.is_paid, o.status, o.phone, o.email,
           o.created_at, o.updated_at,
           u.id AS customer_id, u.full_name AS customer_name,
           u.email AS customer_email, u.phone AS customer_phone
    FROM orders o
    LEFT JOIN users u ON u.id = o.user_id
";

const ITEM_SELECT: &str = r"
    SELECT oi.id, oi.order_id, oi.quantity, oi.size, oi.gender,
           p.id AS product_id, p.name AS product_name, p.price AS product_price,
           COALESCE(
               ARRAY_AGG(pi.url ORDER BY pi.position)
                   FILTER (WHERE pi.url IS NOT NULL),
               '{}'
           ) AS product_images
    FROM order_items oi
    JOIN products p ON p.id = oi.product_id
    LEFT JOIN product_images pi ON pi.product_id = p.id
    WHERE oi.order_id = ANY($1)
    GROUP BY oi.id, oi.order_id, oi.quantity, oi.size, oi.gender,
             p.id, p.name, p.price
";

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

    /// A store's orders newest-first, joined with customers and items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let query = format!("{ORDER_SELECT} WHERE o.store_id = $1 ORDER BY o.created_at DESC");
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(store_id.as_uuid())
            .fetch_all(self.pool)
            .await?;

        self.attach_items(rows).await
    }

    /// A store's paid orders newest-first, each with its computed total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_paid_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<Sale>, RepositoryError> {
        let query = format!(
            "{ORDER_SELECT} WHERE o.store_id = $1 AND o.is_paid ORDER BY o.created_at DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(store_id.as_uuid())
            .fetch_all(self.pool)
            .await?;

        let orders = self.attach_items(rows).await?;
        Ok(orders
            .into_iter()
            .map(|order| Sale {
                total: order.total(),
                order,
            })
            .collect())
    }

    /// A customer's orders across stores, newest-first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let query = format!("{ORDER_SELECT} WHERE o.user_id = $1 ORDER BY o.created_at DESC");
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(user_id.as_uuid())
            .fetch_all(self.pool)
            .await?;

        self.attach_items(rows).await
    }

    /// One order in a store, joined shape.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_in_store(
        &self,
        store_id: StoreId,
        order_id: OrderId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let query = format!("{ORDER_SELECT} WHERE o.id = $1 AND o.store_id = $2");
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(order_id.as_uuid())
            .bind(store_id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut orders = self.attach_items(vec![row]).await?;
        Ok(orders.pop())
    }

    /// Set an order's delivery status and stamp `updated_at`.
    ///
    /// Returns the refreshed joined shape so the caller can notify the
    /// customer and respond without a second round trip of its own.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the order is not in this
    /// store. Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        store_id: StoreId,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderDetail, RepositoryError> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r"
            UPDATE orders
            SET status = $3, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING id
            ",
        )
        .bind(order_id.as_uuid())
        .bind(store_id.as_uuid())
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        if updated.is_none() {
            return Err(RepositoryError::NotFound);
        }

        self.get_in_store(store_id, order_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Load line items for a batch of orders and attach them in place.
    async fn attach_items(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let mut orders: Vec<OrderDetail> = rows.into_iter().map(OrderRow::into_detail).collect();
        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id.as_uuid()).collect();
        let items = sqlx::query_as::<_, ItemRow>(ITEM_SELECT)
            .bind(&ids)
            .fetch_all(self.pool)
            .await?;

        for item in items {
            let (order_id, detail) = item.into_detail();
            if let Some(order) = orders.iter_mut().find(|o| o.id == order_id) {
                order.items.push(detail);
            }
        }

        Ok(orders)
    }
}
