//! Checkout and payment verification handlers.
//!
//! Checkout builds the order from live product prices, never from amounts
//! the client sends, then hands the buyer to the payment gateway. The
//! gateway redirects back to the cart page, which calls verify-payment.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ridgeline_core::{Email, Price, ProductId, StoreId};

use crate::db::{
    NewOrder, NewOrderItem, OrderRepository, ProductRepository, UserRepository,
};
use crate::error::{AppError, Result};
use crate::services::auth::{AuthService, RegisterInput};
use crate::state::AppState;

/// Order references read as `P-` + 6 characters from this alphabet.
const REFERENCE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
const REFERENCE_LENGTH: usize = 6;

/// One line of a checkout request.
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: Option<String>,
    pub gender: Option<String>,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub phone: String,
    pub email: String,
    /// Link the order to a customer account, creating one if needed.
    #[serde(default)]
    pub create_account: bool,
    pub full_name: Option<String>,
}

/// Checkout response: where to send the buyer next.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub reference: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub reference: String,
}

/// Verification outcome plus the cart URL to bounce the buyer back to.
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub url: String,
    pub status: bool,
}

/// Create an unpaid order and initialize a gateway transaction.
///
/// # Errors
///
/// Returns 400 for an empty cart or bad quantities, 404 when any requested
/// product does not exist, and 502 when the gateway rejects the
/// transaction (the order is rolled back first).
#[instrument(skip(state, payload), fields(store_id = %store_id))]
pub async fn checkout(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("order items are required".to_string()));
    }
    if payload.items.iter().any(|item| item.quantity < 1) {
        return Err(AppError::BadRequest(
            "item quantities must be at least 1".to_string(),
        ));
    }
    if payload.phone.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "phone and email are required".to_string(),
        ));
    }

    let products = ProductRepository::new(state.pool());
    let requested: Vec<ProductId> = payload.items.iter().map(|item| item.product_id).collect();
    let found = products.get_for_checkout(&requested).await?;
    let prices: HashMap<ProductId, Price> = found.iter().map(|p| (p.id, p.price)).collect();

    // Total comes from live prices; a stale or forged cart can't set it
    let mut total = Price::ZERO;
    for item in &payload.items {
        let Some(price) = prices.get(&item.product_id) else {
            return Err(AppError::NotFound("products not found".to_string()));
        };
        total = total + price.line_total(item.quantity);
    }

    let user_id = if payload.create_account {
        Some(find_or_create_customer(&state, &payload).await?)
    } else {
        None
    };

    let reference = generate_reference();
    let orders = OrderRepository::new(state.pool());
    let items: Vec<NewOrderItem> = payload
        .items
        .iter()
        .map(|item| NewOrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
            size: item.size.clone(),
            gender: item.gender.clone(),
        })
        .collect();

    let order = orders
        .create_with_items(
            NewOrder {
                store_id,
                user_id,
                reference: &reference,
                phone: &payload.phone,
                email: &payload.email,
            },
            &items,
        )
        .await?;

    let initialized = match state
        .paystack()
        .initialize_transaction(total, &payload.email, &reference, &payload.phone)
        .await
    {
        Ok(initialized) => initialized,
        Err(e) => {
            // The unpaid order must not outlive a failed gateway call
            if let Err(delete_err) = orders.delete(order.id).await {
                tracing::error!(
                    error = %delete_err,
                    order_id = %order.id,
                    "failed to roll back order after gateway error"
                );
            }
            return Err(AppError::Payment(e));
        }
    };

    tracing::info!(order_id = %order.id, reference = %reference, total = %total, "checkout initialized");

    Ok(Json(CheckoutResponse {
        url: initialized.authorization_url,
        reference,
    }))
}

/// Confirm a gateway transaction and mark the order paid.
///
/// Always answers with a cart URL for the frontend to redirect to:
/// `?success=1` when the charge went through and the order was found,
/// `?cancelled=1` otherwise.
///
/// # Errors
///
/// Returns 502 when the gateway cannot be reached.
#[instrument(skip(state, payload), fields(store_id = %store_id))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>> {
    let verified = state
        .paystack()
        .verify_transaction(&payload.reference)
        .await?;
    let store_url = &state.config().frontend_store_url;

    if !verified.is_successful() {
        return Ok(Json(VerifyPaymentResponse {
            url: format!("{store_url}/cart?cancelled=1"),
            status: false,
        }));
    }

    let orders = OrderRepository::new(state.pool());
    let Some(order_id) = orders.mark_paid_by_reference(&payload.reference).await? else {
        tracing::warn!(reference = %payload.reference, "verified payment for unknown order");
        return Ok(Json(VerifyPaymentResponse {
            url: format!("{store_url}/cart?cancelled=1"),
            status: false,
        }));
    };

    tracing::info!(order_id = %order_id, reference = %payload.reference, "payment verified");

    Ok(Json(VerifyPaymentResponse {
        url: format!("{store_url}/cart?success=1"),
        status: true,
    }))
}

/// Look up the customer for a checkout account link, registering a new
/// account (with an emailed generated password) when none exists.
async fn find_or_create_customer(
    state: &AppState,
    payload: &CheckoutRequest,
) -> Result<ridgeline_core::UserId> {
    let email = Email::parse(&payload.email)
        .map_err(|_| AppError::BadRequest("a valid email is required".to_string()))?;

    let users = UserRepository::new(state.pool());
    if let Some(user) = users.get_by_email(&email).await? {
        return Ok(user.id);
    }

    let Some(full_name) = payload
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Err(AppError::BadRequest(
            "full_name is required to create an account".to_string(),
        ));
    };

    let auth = AuthService::new(state.pool(), state.email());
    let user = auth
        .register(RegisterInput {
            full_name: full_name.to_string(),
            email: payload.email.clone(),
            phone: payload.phone.clone(),
            password: None,
            height: None,
            cap_size: None,
            shirt_size: None,
            profile_image: None,
        })
        .await?;

    Ok(user.id)
}

/// Mint an order reference: `P-` + 6 URL-safe characters.
fn generate_reference() -> String {
    let mut rng = rand::rng();
    let mut reference = String::with_capacity(2 + REFERENCE_LENGTH);
    reference.push_str("P-");
    for _ in 0..REFERENCE_LENGTH {
        let idx = rng.random_range(0..REFERENCE_ALPHABET.len());
        reference.push(char::from(REFERENCE_ALPHABET[idx]));
    }
    reference
}
