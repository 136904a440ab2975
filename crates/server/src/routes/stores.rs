//! Store lifecycle handlers: create, update, publish, public storefront data.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use storeforge_core::{Slug, StoreId};

use crate::db::{ProductRepository, StoreRepository, StoreUpdate};
use crate::error::{AppError, Result};
use crate::models::{Product, Store};
use crate::routes::authorize_owner;
use crate::services::provisioning;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub idea: String,
}

/// What the creator needs to keep: the store identity and the owner token
/// that authorizes later edits.
#[derive(Debug, Serialize)]
pub struct CreateStoreResponse {
    pub id: StoreId,
    pub slug: Slug,
    pub brand_name: String,
    pub owner_token: Uuid,
}

/// Create a store from a one-line business idea.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateStoreRequest>,
) -> Result<Json<CreateStoreResponse>> {
    let store = provisioning::create_store(state.pool(), state.parser(), &request.idea).await?;

    Ok(Json(CreateStoreResponse {
        id: store.id,
        slug: store.slug,
        brand_name: store.brand_name,
        owner_token: store.owner_token,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoreRequest {
    pub brand_name: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub hero_image: Option<String>,
}

/// Partially update a store's brand copy. Owner-token protected.
#[instrument(skip(state, headers, request))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    headers: HeaderMap,
    Json(request): Json<UpdateStoreRequest>,
) -> Result<Json<Store>> {
    if let Some(brand_name) = &request.brand_name
        && brand_name.trim().is_empty()
    {
        return Err(AppError::BadRequest("Brand name cannot be empty".to_string()));
    }

    let repo = StoreRepository::new(state.pool());
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    authorize_owner(&headers, &store)?;

    let update = StoreUpdate {
        brand_name: request.brand_name,
        tagline: request.tagline,
        description: request.description,
        hero_image: request.hero_image,
    };

    let store = repo
        .update(id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;

    Ok(Json(store))
}

/// Publish a store. One-way: published stores stay published.
/// Owner-token protected.
#[instrument(skip(state, headers))]
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let repo = StoreRepository::new(state.pool());
    let store = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))?;
    authorize_owner(&headers, &store)?;

    let published = repo.publish(id).await?;

    if !published {
        return Err(AppError::NotFound(format!("store {id}")));
    }

    Ok(Json(json!({ "success": true, "published": true })))
}

#[derive(Debug, Serialize)]
pub struct StorefrontResponse {
    pub store: Store,
    pub products: Vec<Product>,
}

/// Public storefront data: the store and its active catalog, by slug.
#[instrument(skip(state))]
pub async fn storefront(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StorefrontResponse>> {
    let store = StoreRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store @{slug}")))?;

    let products = ProductRepository::new(state.pool())
        .list_for_store(store.id)
        .await?;

    Ok(Json(StorefrontResponse { store, products }))
}
