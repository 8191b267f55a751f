//! Customer directory handlers.
//!
//! Read-only views of storefront accounts. Credential fields never appear
//! here; registration and password changes live in the storefront service.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use ridgeline_core::UserId;

use crate::db::{CustomerRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::{Customer, OrderDetail};
use crate::state::AppState;

/// One customer with their order history, newest first.
#[derive(Debug, Serialize)]
pub struct CustomerDetailResponse {
    pub customer: Customer,
    pub orders: Vec<OrderDetail>,
}

/// List every storefront customer, newest first.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip_all)]
pub async fn list_customers(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
) -> Result<Json<Vec<Customer>>> {
    let customers = CustomerRepository::new(state.pool()).list().await?;
    Ok(Json(customers))
}

/// Fetch one customer with their order history.
///
/// # Errors
///
/// Returns 404 when the customer does not exist.
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn get_customer(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Path(user_id): Path<UserId>,
) -> Result<Json<CustomerDetailResponse>> {
    let customer = CustomerRepository::new(state.pool())
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("customer not found".to_string()))?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(CustomerDetailResponse { customer, orders }))
}
