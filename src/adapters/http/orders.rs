//! Order resource handlers.
//!
//! Creation goes through the order assembler (one transaction for the
//! order row plus its initial line items). Every read answers with
//! computed totals, so the exchange-rate feed is consulted on the way
//! out - once per request, shared across a whole list page. Full
//! update (PUT) is not routed: the id is not replaceable.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::error::ApiError;
use super::server::AppState;
use super::types::{
    OrderCreateBody, OrderPatchBody, OrderResponse, PageQuery, Paginated, page_request,
    parse_date,
};
use crate::domain::catalog::{LineItemDraft, NewOrder, OrderPatch};
use crate::domain::error::ValidationError;
use crate::usecases::order_pricing::PricingError;

/// Surface a pricing failure, counting it for the feed-failure metric.
fn feed_failure(state: &AppState, err: PricingError) -> ApiError {
    state.metrics.upstream_failures.inc();
    ApiError::from(err)
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<OrderResponse>>, ApiError> {
    let page = page_request(state.pagination, &query);
    let orders = state.store.list_orders(page).await?;
    let totals = state
        .pricer
        .price_all(&orders.results)
        .await
        .map_err(|err| feed_failure(&state, err))?;

    let results = orders
        .results
        .into_iter()
        .zip(totals)
        .map(|(order, totals)| OrderResponse::from_parts(order, totals))
        .collect();
    Ok(Json(Paginated::new("/api/orders", page, orders.count, results)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<OrderCreateBody>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let date = match body.date.as_deref() {
        Some(raw) => Some(parse_date(raw).map_err(|err| ApiError::Validation(vec![err]))?),
        None => None,
    };
    let order = NewOrder { id: body.id, date };
    let drafts: Vec<LineItemDraft> = body
        .order_details
        .into_iter()
        .map(|item| LineItemDraft { product_id: item.product_id, quantity: item.quantity })
        .collect();

    let created = state.assembler.create(order, drafts).await?;
    let totals = state
        .pricer
        .price(&created)
        .await
        .map_err(|err| feed_failure(&state, err))?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from_parts(created, totals))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.store.get_order(&id).await?;
    let totals = state
        .pricer
        .price(&order)
        .await
        .map_err(|err| feed_failure(&state, err))?;
    Ok(Json(OrderResponse::from_parts(order, totals)))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<OrderPatchBody>,
) -> Result<Json<OrderResponse>, ApiError> {
    if body.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(ApiError::Validation(vec![ValidationError::ImmutableId]));
    }
    let date = match body.date.as_deref() {
        Some(raw) => Some(parse_date(raw).map_err(|err| ApiError::Validation(vec![err]))?),
        None => None,
    };

    let order = state.store.patch_order(&id, OrderPatch { date }).await?;
    let totals = state
        .pricer
        .price(&order)
        .await
        .map_err(|err| feed_failure(&state, err))?;
    Ok(Json(OrderResponse::from_parts(order, totals)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_order(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
