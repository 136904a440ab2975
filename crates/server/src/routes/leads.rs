//! Lead capture: idempotent email signup with welcome notification.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use storeforge_core::{Email, EventType, StoreId};

use crate::db::{LeadRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::services::analytics::{self, RequestMeta};
use crate::state::AppState;

const DEFAULT_SOURCE: &str = "storefront";

#[derive(Debug, Deserialize)]
pub struct CaptureEmailRequest {
    pub email: String,
    pub source: Option<String>,
}

/// Capture a visitor email for a store.
///
/// Idempotent: resubmitting the same email succeeds without a second lead
/// row, analytics event, or welcome email. Exactly the request that
/// created the lead owns the side effects.
#[instrument(skip(state, headers, request))]
pub async fn capture(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    headers: HeaderMap,
    Json(request): Json<CaptureEmailRequest>,
) -> Result<Json<serde_json::Value>> {
    let email = Email::parse(&request.email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;
    let source = request.source.as_deref().unwrap_or(DEFAULT_SOURCE);

    let store = StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;

    let lead = LeadRepository::new(state.pool())
        .insert_if_new(store.id, &email, source)
        .await?;

    let Some(lead) = lead else {
        return Ok(Json(json!({ "success": true, "message": "Already subscribed" })));
    };

    let meta = RequestMeta::from_headers(&headers);
    analytics::track(
        state.pool(),
        store.id,
        EventType::EmailCapture,
        Some(&json!({ "email": lead.email, "source": source })),
        &meta,
    )
    .await;

    // Welcome email is best-effort; the lead is already persisted. The
    // welcomed flag only flips once the send actually succeeds.
    if let Some(email_service) = state.email() {
        let store_url = state.store_url(store.slug.as_str());
        match email_service
            .send_welcome(lead.email.as_str(), &store.brand_name, &store_url)
            .await
        {
            Ok(()) => {
                if let Err(e) = LeadRepository::new(state.pool()).mark_welcomed(lead.id).await {
                    tracing::error!(error = %e, lead_id = %lead.id, "Failed to record welcome send");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, store_id = %store.id, "Failed to send welcome email");
            }
        }
    }

    Ok(Json(json!({ "success": true })))
}
