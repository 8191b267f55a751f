//! Payment gateway webhook handler.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{OrderRepository, ProductRepository};
use crate::error::Result;
use crate::state::AppState;

/// Gateway event envelope. Only the reference is needed from the data.
#[derive(Debug, Deserialize)]
struct PaystackEvent {
    event: String,
    data: PaystackEventData,
}

#[derive(Debug, Deserialize)]
struct PaystackEventData {
    reference: String,
}

/// Handle a gateway event.
///
/// Unverifiable requests get a 200 and are dropped: the signature check
/// must not leak whether a forgery was close, and the gateway only retries
/// on non-2xx. A `charge.success` event marks the referenced order paid
/// and its products sold; both updates are idempotent, so redelivery of
/// the same event is harmless.
///
/// # Errors
///
/// Returns 500 on database failure, which makes the gateway redeliver.
#[instrument(skip_all)]
pub async fn paystack(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let Some(signature) = headers
        .get("x-paystack-signature")
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("webhook without signature header");
        return Ok(StatusCode::OK);
    };

    if !state.paystack().verify_webhook_signature(&body, signature) {
        tracing::warn!("webhook with invalid signature");
        return Ok(StatusCode::OK);
    }

    let event: PaystackEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "webhook body did not parse");
            return Ok(StatusCode::OK);
        }
    };

    if event.event != "charge.success" {
        tracing::debug!(event = %event.event, "ignoring webhook event");
        return Ok(StatusCode::OK);
    }

    let orders = OrderRepository::new(state.pool());
    let Some(order_id) = orders.mark_paid_by_reference(&event.data.reference).await? else {
        tracing::warn!(reference = %event.data.reference, "charge.success for unknown reference");
        return Ok(StatusCode::OK);
    };

    let sold = ProductRepository::new(state.pool())
        .mark_sold_for_order(order_id)
        .await?;

    tracing::info!(
        order_id = %order_id,
        reference = %event.data.reference,
        products_sold = sold,
        "order paid via webhook"
    );

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_success_event_parses() {
        let body = br#"{
            "event": "charge.success",
            "data": {
                "reference": "P-x7Kq2m",
                "amount": 250000,
                "status": "success"
            }
        }"#;

        let event: PaystackEvent = serde_json::from_slice(body).expect("parses");
        assert_eq!(event.event, "charge.success");
        assert_eq!(event.data.reference, "P-x7Kq2m");
    }

    #[test]
    fn unrelated_event_still_parses() {
        let body = br#"{"event": "transfer.success", "data": {"reference": "T-123456"}}"#;

        let event: PaystackEvent = serde_json::from_slice(body).expect("parses");
        assert_eq!(event.event, "transfer.success");
    }
}
