//! Line-item resource handlers.
//!
//! Create, full update, partial update, delete. There is no index or
//! detail view (GET is not routed - 405); line items are read through
//! their order. The store re-checks stock and per-order uniqueness
//! against the update's merged target inside its transaction.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::error::ApiError;
use super::server::AppState;
use super::types::{LineItemCreateBody, LineItemPatchBody, LineItemResponse};
use crate::domain::catalog::{LineItemPatch, NewLineItem};

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<LineItemCreateBody>,
) -> Result<(StatusCode, Json<LineItemResponse>), ApiError> {
    let item = NewLineItem {
        order_id: body.order_id,
        product_id: body.product_id,
        quantity: body.quantity,
    };
    item.validate().map_err(ApiError::Validation)?;
    let created = state.store.create_line_item(item).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<LineItemCreateBody>,
) -> Result<Json<LineItemResponse>, ApiError> {
    let item = NewLineItem {
        order_id: body.order_id,
        product_id: body.product_id,
        quantity: body.quantity,
    };
    item.validate().map_err(ApiError::Validation)?;
    Ok(Json(state.store.replace_line_item(id, item).await?.into()))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<LineItemPatchBody>,
) -> Result<Json<LineItemResponse>, ApiError> {
    let patch = LineItemPatch {
        order_id: body.order_id,
        product_id: body.product_id,
        quantity: body.quantity,
    };
    patch.validate().map_err(ApiError::Validation)?;
    Ok(Json(state.store.patch_line_item(id, patch).await?.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_line_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
