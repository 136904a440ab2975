//! Payment completion webhook.
//!
//! Verifies the provider signature over the raw body, then applies the
//! conditional PENDING -> COMPLETED transition. Anomalies inside a
//! verified event (missing metadata, unknown order) are logged and acked
//! with 200 so the provider does not redeliver them forever.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use storeforge_core::{EventType, OrderId, StoreId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::services::analytics::{self, RequestMeta};
use crate::services::stripe::{self, WebhookEvent};
use crate::state::AppState;

const COMPLETED_EVENT: &str = "checkout.session.completed";
const UNKNOWN_EMAIL: &str = "unknown@email.com";

fn ack() -> Json<serde_json::Value> {
    Json(json!({ "received": true }))
}

/// Handle a payment provider webhook delivery.
#[instrument(skip(state, headers, body))]
pub async fn stripe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature".to_string()))?;

    stripe::verify_signature(
        &body,
        signature,
        &state.config().stripe.webhook_secret,
        Utc::now().timestamp(),
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        AppError::BadRequest("Invalid signature".to_string())
    })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed event: {e}")))?;

    if event.event_type != COMPLETED_EVENT {
        return Ok(ack());
    }

    let session = event.data.object;

    let ids = session
        .metadata
        .get("order_id")
        .and_then(|v| v.parse::<i32>().ok())
        .zip(
            session
                .metadata
                .get("store_id")
                .and_then(|v| v.parse::<i32>().ok()),
        );
    let Some((order_id, store_id)) = ids else {
        tracing::error!(session_id = %session.id, "Missing metadata in webhook");
        return Ok(ack());
    };
    let order_id = OrderId::new(order_id);
    let store_id = StoreId::new(store_id);

    let (customer_email, customer_name) = match &session.customer_details {
        Some(details) => (
            details.email.as_deref().unwrap_or(UNKNOWN_EMAIL),
            details.name.as_deref(),
        ),
        None => (UNKNOWN_EMAIL, None),
    };

    let orders = OrderRepository::new(state.pool());
    let order = orders
        .complete(
            order_id,
            customer_email,
            customer_name,
            session.payment_intent.as_deref(),
        )
        .await?;

    // None: already completed (redelivery) or unknown order. Either way
    // the side effects below must not run again.
    let Some(order) = order else {
        tracing::info!(%order_id, session_id = %session.id, "Order not pending, skipping");
        return Ok(ack());
    };

    let items = orders.item_details(order.id).await?;

    analytics::track(
        state.pool(),
        store_id,
        EventType::Purchase,
        Some(&json!({
            "orderId": order.id,
            "total": order.total.as_i64(),
            "productCount": items.len(),
        })),
        &RequestMeta::default(),
    )
    .await;

    if let Some(email_service) = state.email() {
        if let Err(e) = email_service
            .send_order_confirmation(
                &order.customer_email,
                order.id,
                &items,
                &order.total.display(),
            )
            .await
        {
            tracing::error!(error = %e, order_id = %order.id, "Failed to send order confirmation");
        }
    }

    tracing::info!(order_id = %order.id, %store_id, "Order completed");
    Ok(ack())
}
