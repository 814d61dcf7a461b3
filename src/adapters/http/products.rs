//! Product resource handlers.
//!
//! Plain CRUD over the store: list (paginated), retrieve, create,
//! full update, partial update, delete. Field constraints are checked
//! before the store is touched; the id is never updatable in place.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::error::ApiError;
use super::server::AppState;
use super::types::{
    PageQuery, Paginated, ProductCreateBody, ProductPatchBody, ProductPutBody,
    ProductResponse, page_request,
};
use crate::domain::catalog::{NewProduct, ProductPatch, ProductUpdate};
use crate::domain::error::ValidationError;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<ProductResponse>>, ApiError> {
    let page = page_request(state.pagination, &query);
    let products = state.store.list_products(page).await?;
    let results = products.results.into_iter().map(ProductResponse::from).collect();
    Ok(Json(Paginated::new("/api/products", page, products.count, results)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<ProductCreateBody>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = NewProduct {
        id: body.id,
        name: body.name,
        price: body.price,
        stock: body.stock,
    };
    product.validate().map_err(ApiError::Validation)?;
    let created = state.store.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    Ok(Json(state.store.get_product(&id).await?.into()))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductPutBody>,
) -> Result<Json<ProductResponse>, ApiError> {
    if body.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(ApiError::Validation(vec![ValidationError::ImmutableId]));
    }
    let update = ProductUpdate {
        name: body.name,
        price: body.price,
        stock: body.stock,
    };
    update.validate().map_err(ApiError::Validation)?;
    Ok(Json(state.store.replace_product(&id, update).await?.into()))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductPatchBody>,
) -> Result<Json<ProductResponse>, ApiError> {
    if body.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(ApiError::Validation(vec![ValidationError::ImmutableId]));
    }
    let patch = ProductPatch {
        name: body.name,
        price: body.price,
        stock: body.stock,
    };
    patch.validate().map_err(ApiError::Validation)?;
    Ok(Json(state.store.patch_product(&id, patch).await?.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
