//! Catalog item handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use tracing::instrument;

use storeforge_core::{Cents, ProductId};

use crate::db::{ProductRepository, ProductUpdate, StoreRepository};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::routes::authorize_owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Cents>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
}

/// Partially update a product's editable fields. Owner-token protected
/// via the owning store.
///
/// Price changes affect future checkouts only; existing orders keep their
/// snapshot.
#[instrument(skip(state, headers, request))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    headers: HeaderMap,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if let Some(price) = request.price
        && !price.is_positive()
    {
        return Err(AppError::BadRequest("Price must be positive".to_string()));
    }
    if let Some(name) = &request.name
        && name.trim().is_empty()
    {
        return Err(AppError::BadRequest("Product name cannot be empty".to_string()));
    }

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let store = StoreRepository::new(state.pool())
        .get(product.store_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {}", product.store_id)))?;
    authorize_owner(&headers, &store)?;

    let update = ProductUpdate {
        name: request.name,
        description: request.description,
        price: request.price,
        image_url: request.image_url,
        active: request.active,
    };

    let product = repo
        .update(id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}
