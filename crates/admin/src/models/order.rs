//! Order views for the dashboard.
//!
//! Orders are always presented joined with the purchasing customer and the
//! product details of each line item, which is what the dashboard order
//! tables render.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ridgeline_core::{Email, OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// An order joined with its customer and line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub id: OrderId,
    pub reference: String,
    pub is_paid: bool,
    pub status: OrderStatus,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Absent for guest checkouts and deleted accounts.
    pub customer: Option<OrderCustomer>,
    pub items: Vec<OrderItemDetail>,
}

impl OrderDetail {
    /// Order value at current catalog prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items
            .iter()
            .map(|item| item.product.price.line_total(item.quantity))
            .sum()
    }
}

/// The customer attached to an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCustomer {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub phone: String,
}

/// One line item, with the product fields the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    pub id: OrderItemId,
    pub quantity: i32,
    pub size: Option<String>,
    pub gender: Option<String>,
    pub product: ProductSummary,
}

/// Product data embedded in an order line.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub images: Vec<String>,
}

/// A paid order on the sales report, with its computed total.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    #[serde(flatten)]
    pub order: OrderDetail,
    pub total: Price,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(price: &str, quantity: i32) -> OrderItemDetail {
        OrderItemDetail {
            id: OrderItemId::generate(),
            quantity,
            size: None,
            gender: None,
            product: ProductSummary {
                id: ProductId::generate(),
                name: "Trail Cap".to_string(),
                price: Price::new(price.parse::<Decimal>().expect("valid decimal")),
                images: Vec::new(),
            },
        }
    }

    fn order_with(items: Vec<OrderItemDetail>) -> OrderDetail {
        OrderDetail {
            id: OrderId::generate(),
            reference: "P-abc123".to_string(),
            is_paid: true,
            status: OrderStatus::Pending,
            phone: "+2348012345678".to_string(),
            email: "ada@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            customer: None,
            items,
        }
    }

    #[test]
    fn total_sums_quantity_weighted_prices() {
        let order = order_with(vec![item("2500.00", 2), item("1000.00", 1)]);
        assert_eq!(order.total().to_string(), "₦6000.00");
    }

    #[test]
    fn total_of_empty_order_is_zero() {
        let order = order_with(Vec::new());
        assert_eq!(order.total(), Price::ZERO);
    }

    #[test]
    fn sale_flattens_order_fields() {
        let order = order_with(vec![item("2500.00", 1)]);
        let total = order.total();
        let sale = Sale { order, total };

        let json = serde_json::to_value(&sale).expect("serializes");
        assert!(json.get("order").is_none());
        assert_eq!(json["reference"], "P-abc123");
        assert_eq!(json["total"], "2500.00");
    }
}
