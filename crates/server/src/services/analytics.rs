//! Analytics tracking and summarization.
//!
//! Tracking is fire-and-forget: a failed insert is logged and swallowed so
//! it can never break the user-facing request that triggered it.
//! Summarization is a pure fold over a window of events.

use std::collections::BTreeMap;

use axum::http::HeaderMap;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use storeforge_core::{EventType, StoreId};

use crate::db::AnalyticsRepository;
use crate::models::AnalyticsEvent;

/// Request attribution extracted from headers.
#[derive(Debug, Default, Clone)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Extract attribution from request headers. Prefers `x-forwarded-for`
    /// over `x-real-ip`; absent or non-UTF-8 headers yield `None`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            ip_address: header_str("x-forwarded-for").or_else(|| header_str("x-real-ip")),
            user_agent: header_str("user-agent"),
        }
    }
}

/// Append an event, swallowing failures.
///
/// Analytics is strictly best-effort: an insert error is logged and the
/// caller proceeds as if it succeeded.
pub async fn track(
    pool: &PgPool,
    store_id: StoreId,
    event_type: EventType,
    metadata: Option<&serde_json::Value>,
    meta: &RequestMeta,
) {
    let metadata_text = metadata.map(serde_json::Value::to_string);

    let result = AnalyticsRepository::new(pool)
        .insert(
            store_id,
            event_type,
            metadata_text.as_deref(),
            meta.ip_address.as_deref(),
            meta.user_agent.as_deref(),
        )
        .await;

    if let Err(e) = result {
        tracing::error!(error = %e, %store_id, ?event_type, "Failed to track analytics event");
    }
}

/// Counters for a single UTC day, for charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub page_views: u64,
    pub checkouts: u64,
    pub purchases: u64,
}

/// Aggregated view of a store's analytics window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub page_views: u64,
    pub checkout_starts: u64,
    pub purchases: u64,
    pub email_captures: u64,
    /// Purchases per checkout start, as a percentage rounded to one
    /// decimal. Zero when no checkouts were started.
    pub conversion_rate: f64,
    /// Daily counters in ascending date order.
    pub chart: Vec<DayBucket>,
}

/// Fold a window of events into totals and per-day chart rows.
#[must_use]
pub fn summarize(events: &[AnalyticsEvent]) -> AnalyticsSummary {
    let mut page_views = 0u64;
    let mut checkout_starts = 0u64;
    let mut purchases = 0u64;
    let mut email_captures = 0u64;

    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for event in events {
        let date = event.created_at.date_naive();
        let bucket = days.entry(date).or_insert_with(|| DayBucket {
            date,
            page_views: 0,
            checkouts: 0,
            purchases: 0,
        });

        match event.event_type {
            EventType::PageView => {
                page_views += 1;
                bucket.page_views += 1;
            }
            EventType::CheckoutStart => {
                checkout_starts += 1;
                bucket.checkouts += 1;
            }
            EventType::Purchase => {
                purchases += 1;
                bucket.purchases += 1;
            }
            EventType::EmailCapture => {
                email_captures += 1;
            }
        }
    }

    let conversion_rate = if checkout_starts > 0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = purchases as f64 / checkout_starts as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    } else {
        0.0
    };

    AnalyticsSummary {
        page_views,
        checkout_starts,
        purchases,
        email_captures,
        conversion_rate,
        chart: days.into_values().collect(),
    }
}
