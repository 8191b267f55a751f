//! Dashboard statistics queries.

use chrono::{DateTime, Datelike, Utc};
use sqlx::PgPool;

use ridgeline_core::{Price, StoreId};

use super::RepositoryError;
use crate::models::{MonthlyRevenue, StoreStats};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One paid line item with the order's creation time.
#[derive(sqlx::FromRow)]
struct RevenueRow {
    created_at: DateTime<Utc>,
    quantity: i32,
    price: Price,
}

/// Repository for dashboard overview figures.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Headline numbers and revenue-by-month for one store.
    ///
    /// Revenue values paid orders' items at the current catalog price, which
    /// tracks the dashboard product table rather than historical charge
    /// amounts. Graph buckets are keyed by order-creation month.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn store_stats(&self, store_id: StoreId) -> Result<StoreStats, RepositoryError> {
        let sales_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE store_id = $1 AND is_paid",
        )
        .bind(store_id.as_uuid())
        .fetch_one(self.pool)
        .await?;

        let stock_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE store_id = $1 AND NOT is_archived",
        )
        .bind(store_id.as_uuid())
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RevenueRow>(
            r"
            SELECT o.created_at, oi.quantity, p.price
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            JOIN products p ON p.id = oi.product_id
            WHERE o.store_id = $1 AND o.is_paid
            ",
        )
        .bind(store_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        let (total_revenue, graph_revenue) = bucket_revenue(&rows);

        Ok(StoreStats {
            total_revenue,
            sales_count,
            stock_count,
            graph_revenue,
        })
    }
}

/// Sum line revenue overall and per order-creation month.
fn bucket_revenue(rows: &[RevenueRow]) -> (Price, Vec<MonthlyRevenue>) {
    let mut monthly = [Price::ZERO; 12];
    let mut total = Price::ZERO;

    for row in rows {
        let line = row.price.line_total(row.quantity);
        total = total + line;

        let month = row.created_at.month0() as usize;
        if let Some(bucket) = monthly.get_mut(month) {
            *bucket = *bucket + line;
        }
    }

    let graph = MONTH_LABELS
        .iter()
        .zip(monthly)
        .map(|(name, total)| MonthlyRevenue {
            name: (*name).to_string(),
            total,
        })
        .collect();

    (total, graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn row(month: u32, price: &str, quantity: i32) -> RevenueRow {
        RevenueRow {
            created_at: Utc
                .with_ymd_and_hms(2025, month, 15, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
            quantity,
            price: Price::new(price.parse::<Decimal>().expect("valid decimal")),
        }
    }

    #[test]
    fn buckets_revenue_by_order_month() {
        let rows = vec![row(1, "2500.00", 2), row(1, "1000.00", 1), row(6, "500.00", 4)];
        let (total, graph) = bucket_revenue(&rows);

        assert_eq!(total.to_string(), "₦8000.00");
        assert_eq!(graph.len(), 12);

        let january = graph.first().expect("twelve buckets");
        assert_eq!(january.name, "Jan");
        assert_eq!(january.total.to_string(), "₦6000.00");

        let june = graph.get(5).expect("twelve buckets");
        assert_eq!(june.name, "Jun");
        assert_eq!(june.total.to_string(), "₦2000.00");

        let december = graph.last().expect("twelve buckets");
        assert_eq!(december.name, "Dec");
        assert_eq!(december.total, Price::ZERO);
    }

    #[test]
    fn empty_rows_produce_zeroed_buckets() {
        let (total, graph) = bucket_revenue(&[]);
        assert_eq!(total, Price::ZERO);
        assert_eq!(graph.len(), 12);
        assert!(graph.iter().all(|bucket| bucket.total == Price::ZERO));
    }
}
