//! Order models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ridgeline_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, StoreId, UserId};

/// An order as stored, with its line items.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub user_id: Option<UserId>,
    pub reference: String,
    pub is_paid: bool,
    pub status: OrderStatus,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Populated by the repository after the row fetch.
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
}

/// One line item on an order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: Option<String>,
    pub gender: Option<String>,
}

/// An order in a customer's history, joined with product details.
#[derive(Debug, Clone, Serialize)]
pub struct OrderHistory {
    pub id: OrderId,
    pub reference: String,
    pub is_paid: bool,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderHistoryItem>,
}

/// A history line item carrying the product fields the frontend renders.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderHistoryItem {
    #[serde(skip_serializing)]
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Price,
    pub product_images: Vec<String>,
    pub quantity: i32,
    pub size: Option<String>,
    pub gender: Option<String>,
}
