//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (DB ping)
//!
//! # Stores
//! POST  /api/stores                         - Create store from a business idea
//! PATCH /api/stores/{id}                    - Update brand copy / hero image [owner]
//! POST  /api/stores/{id}/publish            - Publish (one-way) [owner]
//! POST  /api/stores/{id}/capture-email      - Idempotent lead capture
//! GET   /api/storefront/{slug}              - Public store + active catalog
//!
//! # Products
//! PATCH /api/products/{id}                  - Update catalog item [owner]
//!
//! # Checkout
//! POST /api/checkout                        - Snapshot order + payment session
//! POST /api/webhooks/stripe                 - Payment completion webhook
//!
//! # Analytics
//! POST /api/analytics/{store_id}/track      - Append an event
//! GET  /api/analytics/{store_id}/summary    - Totals + daily chart
//! ```
//!
//! Routes marked `[owner]` require the `x-owner-token` header to match the
//! capability token issued when the store was created.

pub mod analytics;
pub mod checkout;
pub mod leads;
pub mod products;
pub mod stores;
pub mod webhooks;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Store;
use crate::state::AppState;

/// Header carrying the owner capability token on mutating routes.
pub const OWNER_TOKEN_HEADER: &str = "x-owner-token";

/// Check that the request presents the store's owner token.
///
/// A missing, malformed, or mismatched token is rejected uniformly; the
/// response never reveals which of the three it was.
fn authorize_owner(headers: &HeaderMap, store: &Store) -> Result<(), AppError> {
    let presented = headers
        .get(OWNER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok());

    if presented == Some(store.owner_token) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/stores", post(stores::create))
        .route("/api/stores/{id}", patch(stores::update))
        .route("/api/stores/{id}/publish", post(stores::publish))
        .route("/api/stores/{id}/capture-email", post(leads::capture))
        .route("/api/storefront/{slug}", get(stores::storefront))
        .route("/api/products/{id}", patch(products::update))
        .route("/api/checkout", post(checkout::create_session))
        .route("/api/webhooks/stripe", post(webhooks::stripe))
        .route("/api/analytics/{store_id}/track", post(analytics::track))
        .route("/api/analytics/{store_id}/summary", get(analytics::summary))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use storeforge_core::{Slug, StoreId};

    use super::*;

    fn store_with_token(token: Uuid) -> Store {
        Store {
            id: StoreId::new(1),
            owner_token: token,
            brand_name: "Zen Flow".to_string(),
            slug: Slug::from_text("zen-flow"),
            tagline: "Zen Flow - Your trusted partner".to_string(),
            description: "Welcome to Zen Flow!".to_string(),
            raw_idea: "I teach yoga".to_string(),
            hero_image: None,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_authorize_owner_accepts_matching_token() {
        let token = Uuid::new_v4();
        let store = store_with_token(token);

        let mut headers = HeaderMap::new();
        headers.insert(OWNER_TOKEN_HEADER, token.to_string().parse().unwrap());

        assert!(authorize_owner(&headers, &store).is_ok());
    }

    #[test]
    fn test_authorize_owner_rejects_missing_header() {
        let store = store_with_token(Uuid::new_v4());
        let result = authorize_owner(&HeaderMap::new(), &store);
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_authorize_owner_rejects_wrong_token() {
        let store = store_with_token(Uuid::new_v4());

        let mut headers = HeaderMap::new();
        headers.insert(OWNER_TOKEN_HEADER, Uuid::new_v4().to_string().parse().unwrap());

        assert!(matches!(
            authorize_owner(&headers, &store),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_authorize_owner_rejects_malformed_token() {
        let store = store_with_token(Uuid::new_v4());

        let mut headers = HeaderMap::new();
        headers.insert(OWNER_TOKEN_HEADER, "not-a-uuid".parse().unwrap());

        assert!(matches!(
            authorize_owner(&headers, &store),
            Err(AppError::Forbidden)
        ));
    }
}
