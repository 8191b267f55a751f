//! Order management handlers.
//!
//! Orders come back joined with the customer account (when the order has
//! one) and the line items priced at the current catalog price. A status
//! change notifies the customer by email; delivery problems are logged and
//! never fail the request.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ridgeline_core::{OrderId, OrderStatus, StoreId};

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::{OrderDetail, Sale};
use crate::state::AppState;

use super::ensure_store_owner;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub order: OrderDetail,
    pub message: &'static str,
}

/// List the store's orders, newest first.
///
/// # Errors
///
/// Returns 405 when the store is not the caller's.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id))]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<OrderDetail>>> {
    ensure_store_owner(&state, store_id, &owner).await?;

    let orders = OrderRepository::new(state.pool())
        .list_for_store(store_id)
        .await?;

    Ok(Json(orders))
}

/// Fetch one order with its customer and items.
///
/// # Errors
///
/// Returns 404 when the order does not exist in this store and 405 when
/// the store is not the caller's.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id, order_id = %order_id))]
pub async fn get_order(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path((store_id, order_id)): Path<(StoreId, OrderId)>,
) -> Result<Json<OrderDetail>> {
    ensure_store_owner(&state, store_id, &owner).await?;

    let order = OrderRepository::new(state.pool())
        .get_in_store(store_id, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    Ok(Json(order))
}

/// Move an order to a new delivery status and notify the customer.
///
/// Guest orders have no linked account, so there is nobody to email; the
/// status still updates.
///
/// # Errors
///
/// Returns 400 for an unknown status value, 404 when the order does not
/// exist, and 405 when the store is not the caller's.
#[instrument(skip(state, payload), fields(owner = %owner, store_id = %store_id, order_id = %order_id))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path((store_id, order_id)): Path<(StoreId, OrderId)>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid status".to_string()))?;

    ensure_store_owner(&state, store_id, &owner).await?;

    let order = OrderRepository::new(state.pool())
        .update_status(store_id, order_id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("order not found".to_string()),
            other => AppError::Database(other),
        })?;

    if let Some(customer) = &order.customer {
        if let Err(err) = state
            .email()
            .send_order_status(
                customer.email.as_str(),
                &customer.full_name,
                &order.reference,
                status,
            )
            .await
        {
            tracing::error!(
                error = %err,
                reference = %order.reference,
                "Failed to send order status email"
            );
        }
    }

    Ok(Json(UpdateStatusResponse {
        order,
        message: "Order status updated successfully",
    }))
}

/// List the store's paid orders with per-order totals.
///
/// # Errors
///
/// Returns 405 when the store is not the caller's.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id))]
pub async fn list_sales(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Sale>>> {
    ensure_store_owner(&state, store_id, &owner).await?;

    let sales = OrderRepository::new(state.pool())
        .list_paid_for_store(store_id)
        .await?;

    Ok(Json(sales))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_does_not_parse() {
        let request: UpdateStatusRequest =
            serde_json::from_str(r#"{"status": "shipped"}"#).expect("parses");
        assert!(request.status.parse::<OrderStatus>().is_err());
    }

    #[test]
    fn spaced_status_label_parses() {
        let request: UpdateStatusRequest =
            serde_json::from_str(r#"{"status": "out for delivery"}"#).expect("parses");
        assert_eq!(
            request.status.parse::<OrderStatus>(),
            Ok(OrderStatus::OutForDelivery)
        );
    }

    #[test]
    fn missing_status_defaults_to_empty_and_fails_parse() {
        let request: UpdateStatusRequest = serde_json::from_str("{}").expect("parses");
        assert!(request.status.parse::<OrderStatus>().is_err());
    }
}
