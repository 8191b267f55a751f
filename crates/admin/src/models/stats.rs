//! Dashboard overview figures.

use serde::Serialize;

use ridgeline_core::Price;

/// Headline numbers and the revenue-by-month series for one store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    /// Revenue across all paid orders, at current catalog prices.
    pub total_revenue: Price,
    /// Number of paid orders.
    pub sales_count: i64,
    /// Number of products not archived.
    pub stock_count: i64,
    /// Twelve buckets, January through December of the current year span.
    pub graph_revenue: Vec<MonthlyRevenue>,
}

/// One bar of the revenue chart.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    /// Abbreviated month label ("Jan" .. "Dec").
    pub name: String,
    pub total: Price,
}
