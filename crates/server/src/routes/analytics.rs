//! Analytics endpoints: event ingestion and store summaries.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use storeforge_core::{EventType, StoreId};

use crate::db::{AnalyticsRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::services::analytics::{self, AnalyticsSummary, RequestMeta};
use crate::state::AppState;

const DEFAULT_WINDOW_DAYS: i64 = 30;
const MAX_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub event_type: EventType,
    pub metadata: Option<serde_json::Value>,
}

/// Append a visitor event for a store.
///
/// Always succeeds for an existing store: ingestion failures are swallowed
/// so analytics can never break the storefront.
#[instrument(skip(state, headers, request))]
pub async fn track(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    headers: HeaderMap,
    Json(request): Json<TrackRequest>,
) -> Result<Json<serde_json::Value>> {
    let store = StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;

    let meta = RequestMeta::from_headers(&headers);
    analytics::track(
        state.pool(),
        store.id,
        request.event_type,
        request.metadata.as_ref(),
        &meta,
    )
    .await;

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub days: Option<i64>,
}

/// Summarize a store's trailing analytics window (default 30 days).
#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<AnalyticsSummary>> {
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }

    let store = StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;

    let since = Utc::now() - Duration::days(days);
    let events = AnalyticsRepository::new(state.pool())
        .events_since(store.id, since)
        .await?;

    Ok(Json(analytics::summarize(&events)))
}
