//! Stripe Checkout client and webhook signature verification.
//!
//! Only the two surfaces the checkout flow needs: creating a hosted
//! Checkout Session (form-encoded POST, per Stripe's API) and verifying
//! the `Stripe-Signature` header on webhook deliveries.

use std::collections::HashMap;
use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;

use storeforge_core::{Cents, OrderId, StoreId};

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum age of a webhook delivery before its signature is rejected.
pub const SIGNATURE_TOLERANCE: Duration = Duration::from_secs(300);

/// Errors from the Stripe API client.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe returned an error response.
    #[error("Stripe API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Session was created but carries no redirect URL.
    #[error("checkout session has no URL")]
    MissingSessionUrl,
}

/// Webhook signature verification failures. All of them are the caller's
/// (or an attacker's) fault, never ours; routes map these to 400.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Header is not in `t=...,v1=...` form.
    #[error("malformed signature header")]
    Malformed,

    /// Timestamp is outside the accepted tolerance window.
    #[error("signature timestamp outside tolerance")]
    StaleTimestamp,

    /// No candidate signature matched the payload.
    #[error("signature mismatch")]
    Mismatch,
}

/// A line item for a hosted checkout session. Prices are the snapshot
/// taken at order creation, not live product rows.
#[derive(Debug, Clone)]
pub struct SessionLineItem {
    pub name: String,
    pub description: Option<String>,
    pub unit_amount: Cents,
}

/// Parameters for creating a hosted checkout session.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub line_items: Vec<SessionLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Round-tripped through Stripe metadata back to the webhook.
    pub order_id: OrderId,
    pub store_id: StoreId,
}

/// A created checkout session: the ID we persist and the URL the customer
/// is redirected to.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

impl CheckoutSession {
    /// The redirect URL.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::MissingSessionUrl` if Stripe omitted it.
    pub fn redirect_url(&self) -> Result<&str, StripeError> {
        self.url.as_deref().ok_or(StripeError::MissingSessionUrl)
    }
}

/// Client for the Stripe Checkout API.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: reqwest::Client,
}

impl StripeClient {
    /// Create a new client authenticated with the given secret key.
    ///
    /// # Panics
    ///
    /// Panics if the secret key contains invalid header characters.
    #[must_use]
    pub fn new(secret_key: &SecretString) -> Self {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", secret_key.expose_secret()))
            .expect("Invalid Stripe secret key for header");
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Create a hosted checkout session in payment mode.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` if Stripe rejects the request and
    /// `StripeError::Http` on transport failure.
    #[instrument(skip(self, params), fields(order_id = %params.order_id))]
    pub async fn create_checkout_session(
        &self,
        params: &SessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let form = session_form(params);

        let response = self
            .client
            .post(CHECKOUT_SESSIONS_URL)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Encode session parameters as Stripe's bracketed form pairs.
fn session_form(params: &SessionParams) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        (
            "payment_method_types[0]".to_string(),
            "card".to_string(),
        ),
        ("success_url".to_string(), params.success_url.clone()),
        ("cancel_url".to_string(), params.cancel_url.clone()),
        (
            "metadata[order_id]".to_string(),
            params.order_id.to_string(),
        ),
        (
            "metadata[store_id]".to_string(),
            params.store_id.to_string(),
        ),
    ];

    for (i, item) in params.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((format!("{prefix}[quantity]"), "1".to_string()));
        form.push((
            format!("{prefix}[price_data][currency]"),
            "usd".to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.as_i64().to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        if let Some(description) = &item.description {
            form.push((
                format!("{prefix}[price_data][product_data][description]"),
                description.clone(),
            ));
        }
    }

    form
}

/// A webhook event envelope. Only `checkout.session.completed` carries a
/// payload we act on; everything else is acknowledged and dropped.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: CheckoutSessionObject,
}

/// The session object inside a `checkout.session.completed` event.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header carries a unix timestamp and one or more `v1` signatures;
/// each candidate is an HMAC-SHA256 of `"{timestamp}.{body}"` under the
/// endpoint secret, hex-encoded. `now` is injected for testability.
///
/// # Errors
///
/// Returns a [`SignatureError`] describing why verification failed.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &SecretString,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed);
    }

    #[allow(clippy::cast_possible_wrap)]
    let tolerance = SIGNATURE_TOLERANCE.as_secs() as i64;
    if (now - timestamp).abs() > tolerance {
        return Err(SignatureError::StaleTimestamp);
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| SignatureError::Malformed)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let expected = mac.finalize().into_bytes();

    for candidate in candidates {
        if let Ok(bytes) = hex::decode(candidate)
            && constant_time_eq(&bytes, &expected)
        {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("whsec_test_secret_key")
    }

    fn sign(payload: &[u8], timestamp: i64) -> String {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(secret().expose_secret().as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_accepts_valid_header() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(payload, now));

        assert_eq!(verify_signature(payload, &header, &secret(), now), Ok(()));
    }

    #[test]
    fn test_verify_signature_accepts_within_tolerance() {
        let payload = b"{}";
        let ts = 1_700_000_000;
        let header = format!("t={ts},v1={}", sign(payload, ts));

        assert_eq!(
            verify_signature(payload, &header, &secret(), ts + 299),
            Ok(())
        );
    }

    #[test]
    fn test_verify_signature_rejects_stale_timestamp() {
        let payload = b"{}";
        let ts = 1_700_000_000;
        let header = format!("t={ts},v1={}", sign(payload, ts));

        assert_eq!(
            verify_signature(payload, &header, &secret(), ts + 301),
            Err(SignatureError::StaleTimestamp)
        );
    }

    #[test]
    fn test_verify_signature_rejects_tampered_payload() {
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(payload, now));

        assert_eq!(
            verify_signature(b"{tampered}", &header, &secret(), now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_verify_signature_rejects_wrong_secret() {
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(payload, now));
        let other = SecretString::from("whsec_other");

        assert_eq!(
            verify_signature(payload, &header, &other, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_verify_signature_rejects_malformed_headers() {
        let now = 1_700_000_000;
        for header in ["", "t=abc,v1=00", "v1=00", "t=1700000000"] {
            assert_eq!(
                verify_signature(b"{}", header, &secret(), now),
                Err(SignatureError::Malformed),
                "header: {header:?}"
            );
        }
    }

    #[test]
    fn test_verify_signature_accepts_second_candidate() {
        // Key-rotation case: one bad candidate, one good
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={now},v1={},v1={}", "00".repeat(32), sign(payload, now));

        assert_eq!(verify_signature(payload, &header, &secret(), now), Ok(()));
    }

    #[test]
    fn test_session_form_encodes_line_items_and_metadata() {
        let params = SessionParams {
            line_items: vec![
                SessionLineItem {
                    name: "Starter Guide".to_string(),
                    description: Some("Get started".to_string()),
                    unit_amount: Cents::new(2900),
                },
                SessionLineItem {
                    name: "Consultation".to_string(),
                    description: None,
                    unit_amount: Cents::new(9900),
                },
            ],
            success_url: "https://example.com/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://example.com/@zen-flow".to_string(),
            order_id: OrderId::new(7),
            store_id: StoreId::new(3),
        };

        let form = session_form(&params);
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("metadata[order_id]"), Some("7"));
        assert_eq!(get("metadata[store_id]"), Some("3"));
        assert_eq!(
            get("line_items[0][price_data][unit_amount]"),
            Some("2900")
        );
        assert_eq!(
            get("line_items[1][price_data][product_data][name]"),
            Some("Consultation")
        );
        // No description pair for the item that has none
        assert_eq!(
            get("line_items[1][price_data][product_data][description]"),
            None
        );
    }

    #[test]
    fn test_webhook_event_deserializes() {
        let json = r#"{
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_123",
                    "payment_intent": "pi_test_456",
                    "customer_details": {"email": "buyer@example.com", "name": "Buyer"},
                    "metadata": {"order_id": "7", "store_id": "3"}
                }
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        let object = event.data.object;
        assert_eq!(object.id, "cs_test_123");
        assert_eq!(object.payment_intent.as_deref(), Some("pi_test_456"));
        assert_eq!(object.metadata.get("order_id").map(String::as_str), Some("7"));
    }
}
