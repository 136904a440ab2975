//! Checkout orchestration: selection validation, price snapshot, hosted
//! payment session.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use storeforge_core::{Cents, EventType, ProductId, StoreId};

use crate::db::{NewOrderItem, OrderRepository, ProductRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::services::analytics::{self, RequestMeta};
use crate::services::stripe::{SessionLineItem, SessionParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub store_id: StoreId,
    pub product_ids: Vec<ProductId>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Hosted payment page to redirect the customer to.
    pub url: String,
}

/// Start a checkout: validate the selection, snapshot prices into a
/// PENDING order, and open a hosted payment session.
///
/// If the payment session cannot be created the pending order is deleted
/// before the error is surfaced, so no orphaned orders accumulate.
#[instrument(skip(state, headers, request), fields(store_id = %request.store_id))]
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    if request.product_ids.is_empty() {
        return Err(AppError::BadRequest("Product IDs are required".to_string()));
    }

    let store = StoreRepository::new(state.pool())
        .get(request.store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {}", request.store_id)))?;

    let products = ProductRepository::new(state.pool())
        .list_active_for_store(store.id, &request.product_ids)
        .await?;

    if products.len() != request.product_ids.len() {
        return Err(AppError::BadRequest(
            "Some products not found or inactive".to_string(),
        ));
    }

    let total: Cents = products.iter().map(|p| p.price).sum();
    let items: Vec<NewOrderItem> = products
        .iter()
        .map(|p| NewOrderItem {
            product_id: p.id,
            quantity: 1,
            price: p.price,
        })
        .collect();

    let orders = OrderRepository::new(state.pool());
    let order = orders.create_pending(store.id, total, &items).await?;

    let params = SessionParams {
        line_items: products
            .iter()
            .map(|p| SessionLineItem {
                name: p.name.clone(),
                description: (!p.description.is_empty()).then(|| p.description.clone()),
                unit_amount: p.price,
            })
            .collect(),
        success_url: format!(
            "{}/success?session_id={{CHECKOUT_SESSION_ID}}",
            state.config().base_url
        ),
        cancel_url: state.store_url(store.slug.as_str()),
        order_id: order.id,
        store_id: store.id,
    };

    // Local state first, then the external call; roll the order back if
    // the session never materializes.
    let session = match state.stripe().create_checkout_session(&params).await {
        Ok(session) => session,
        Err(e) => {
            if let Err(delete_err) = orders.delete(order.id).await {
                tracing::error!(
                    error = %delete_err,
                    order_id = %order.id,
                    "Failed to roll back pending order"
                );
            }
            return Err(e.into());
        }
    };

    let url = match session.redirect_url() {
        Ok(url) => url.to_string(),
        Err(e) => {
            if let Err(delete_err) = orders.delete(order.id).await {
                tracing::error!(
                    error = %delete_err,
                    order_id = %order.id,
                    "Failed to roll back pending order"
                );
            }
            return Err(e.into());
        }
    };

    orders.set_session_id(order.id, &session.id).await?;

    let meta = RequestMeta::from_headers(&headers);
    analytics::track(
        state.pool(),
        store.id,
        EventType::CheckoutStart,
        Some(&json!({ "orderId": order.id, "total": total.as_i64() })),
        &meta,
    )
    .await;

    Ok(Json(CheckoutResponse { url }))
}
