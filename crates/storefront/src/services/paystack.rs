//! Paystack payment gateway client.
//!
//! Covers the three touchpoints with the gateway: transaction
//! initialization at checkout, transaction verification on redirect, and
//! webhook signature verification.
//!
//! # API Reference
//!
//! - Base URL: `https://api.paystack.co`
//! - Authentication: secret key via `Authorization: Bearer <key>`
//! - Amounts: integer subunits (kobo), 100 per naira
//! - Webhooks: HMAC-SHA512 over the raw body, hex in `x-paystack-signature`

use std::sync::Arc;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use thiserror::Error;
use tracing::instrument;

use ridgeline_core::Price;

use crate::config::PaystackConfig;

type HmacSha512 = Hmac<Sha512>;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaystackError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API answered 2xx but flagged the call as failed.
    #[error("gateway declined: {0}")]
    Declined(String),

    /// Order total does not fit the gateway's integer subunit range.
    #[error("amount too large for subunit conversion")]
    AmountOverflow,
}

/// Transaction initialization payload.
#[derive(Debug, Serialize)]
pub struct InitializeTransaction<'a> {
    /// Amount in integer subunits.
    pub amount: i64,
    pub email: &'a str,
    pub reference: &'a str,
    pub metadata: TransactionMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct TransactionMetadata<'a> {
    pub custom_fields: Vec<CustomField<'a>>,
}

/// One metadata entry shown on the gateway dashboard.
#[derive(Debug, Serialize)]
pub struct CustomField<'a> {
    pub display_name: &'a str,
    pub variable_name: &'a str,
    pub value: &'a str,
}

/// Response envelope shared by Paystack endpoints.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

/// An initialized transaction ready for the customer to authorize.
#[derive(Debug, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// The gateway's view of a transaction at verification time.
#[derive(Debug, Deserialize)]
pub struct VerifiedTransaction {
    pub status: String,
    pub reference: String,
    pub amount: i64,
}

impl VerifiedTransaction {
    /// Whether the charge went through.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }
}

/// Paystack API client.
#[derive(Clone)]
pub struct PaystackClient {
    inner: Arc<PaystackClientInner>,
}

struct PaystackClientInner {
    client: reqwest::Client,
    base_url: String,
    secret_key: SecretString,
}

impl PaystackClient {
    /// Create a new payment gateway client.
    #[must_use]
    pub fn new(config: &PaystackConfig) -> Self {
        Self {
            inner: Arc::new(PaystackClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                secret_key: config.secret_key.clone(),
            }),
        }
    }

    /// Initialize a transaction for an order total.
    ///
    /// The buyer's phone number travels in metadata custom fields so it
    /// shows up on the gateway dashboard next to the payment.
    ///
    /// # Errors
    ///
    /// Returns `PaystackError::AmountOverflow` if the total cannot be
    /// expressed in integer subunits, or an API/HTTP error from the gateway.
    #[instrument(skip(self, email, phone), fields(reference = %reference))]
    pub async fn initialize_transaction(
        &self,
        total: Price,
        email: &str,
        reference: &str,
        phone: &str,
    ) -> Result<InitializedTransaction, PaystackError> {
        let amount = total.to_subunits().ok_or(PaystackError::AmountOverflow)?;

        let payload = InitializeTransaction {
            amount,
            email,
            reference,
            metadata: TransactionMetadata {
                custom_fields: vec![CustomField {
                    display_name: "Phone Number",
                    variable_name: "phone",
                    value: phone,
                }],
            },
        };

        let response = self
            .inner
            .client
            .post(format!("{}/transaction/initialize", self.inner.base_url))
            .bearer_auth(self.inner.secret_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaystackError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ApiResponse<InitializedTransaction> = response.json().await?;
        if !body.status {
            return Err(PaystackError::Declined(body.message));
        }

        body.data
            .ok_or_else(|| PaystackError::Declined("missing transaction data".to_string()))
    }

    /// Look up a transaction by reference.
    ///
    /// # Errors
    ///
    /// Returns an API/HTTP error from the gateway.
    #[instrument(skip(self))]
    pub async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<VerifiedTransaction, PaystackError> {
        let response = self
            .inner
            .client
            .get(format!(
                "{}/transaction/verify/{reference}",
                self.inner.base_url
            ))
            .bearer_auth(self.inner.secret_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaystackError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ApiResponse<VerifiedTransaction> = response.json().await?;
        if !body.status {
            return Err(PaystackError::Declined(body.message));
        }

        body.data
            .ok_or_else(|| PaystackError::Declined("missing transaction data".to_string()))
    }

    /// Check a webhook body against its `x-paystack-signature` header.
    ///
    /// Recomputes HMAC-SHA512 over the raw body with the secret key and
    /// compares through the Mac verify API, which is constant-time; a
    /// forged header can't be felt out byte by byte.
    #[must_use]
    pub fn verify_webhook_signature(&self, body: &[u8], signature_hex: &str) -> bool {
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };

        let Ok(mut mac) =
            HmacSha512::new_from_slice(self.inner.secret_key.expose_secret().as_bytes())
        else {
            return false;
        };

        mac.update(body);
        mac.verify_slice(&signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn test_client(secret: &str) -> PaystackClient {
        PaystackClient::new(&PaystackConfig {
            secret_key: SecretString::from(secret),
            base_url: "https://api.paystack.co".to_string(),
        })
    }

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac =
            HmacSha512::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn initialize_payload_serializes_subunits_and_metadata() {
        let payload = InitializeTransaction {
            amount: Price::new(Decimal::new(2500, 0))
                .to_subunits()
                .expect("fits"),
            email: "buyer@example.com",
            reference: "P-x7Kq2m",
            metadata: TransactionMetadata {
                custom_fields: vec![CustomField {
                    display_name: "Phone Number",
                    variable_name: "phone",
                    value: "+2348012345678",
                }],
            },
        };

        let json = serde_json::to_value(&payload).expect("serializes");
        assert_eq!(json["amount"], serde_json::json!(250_000));
        assert_eq!(json["reference"], serde_json::json!("P-x7Kq2m"));
        assert_eq!(
            json["metadata"]["custom_fields"][0]["display_name"],
            serde_json::json!("Phone Number")
        );
        assert_eq!(
            json["metadata"]["custom_fields"][0]["value"],
            serde_json::json!("+2348012345678")
        );
    }

    #[test]
    fn valid_signature_is_accepted() {
        let client = test_client("sk_test_abc123");
        let body = br#"{"event":"charge.success","data":{"reference":"P-x7Kq2m"}}"#;
        let signature = sign("sk_test_abc123", body);

        assert!(client.verify_webhook_signature(body, &signature));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let client = test_client("sk_test_abc123");
        let body = br#"{"event":"charge.success","data":{"reference":"P-x7Kq2m"}}"#;
        let signature = sign("sk_test_abc123", body);

        let tampered = br#"{"event":"charge.success","data":{"reference":"P-other1"}}"#;
        assert!(!client.verify_webhook_signature(tampered, &signature));
    }

    #[test]
    fn signature_from_wrong_key_is_rejected() {
        let client = test_client("sk_test_abc123");
        let body = br#"{"event":"charge.success"}"#;
        let signature = sign("sk_test_different", body);

        assert!(!client.verify_webhook_signature(body, &signature));
    }

    #[test]
    fn non_hex_signature_is_rejected() {
        let client = test_client("sk_test_abc123");
        assert!(!client.verify_webhook_signature(b"{}", "not hex at all"));
        assert!(!client.verify_webhook_signature(b"{}", ""));
    }

    #[test]
    fn verified_transaction_success_check() {
        let success = VerifiedTransaction {
            status: "success".to_string(),
            reference: "P-x7Kq2m".to_string(),
            amount: 250_000,
        };
        let failed = VerifiedTransaction {
            status: "failed".to_string(),
            reference: "P-x7Kq2m".to_string(),
            amount: 250_000,
        };

        assert!(success.is_successful());
        assert!(!failed.is_successful());
    }
}
