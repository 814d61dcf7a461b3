//! API Request/Response Types
//!
//! Serialization shapes for the JSON surface. Requests reference
//! related rows by `product_id`/`order_id`; responses echo resolved
//! identifiers plus timestamps. Order responses carry both computed
//! totals (`null` when the order has no line items).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::domain::catalog::{LineItem, OrderWithItems, Product};
use crate::domain::error::ValidationError;
use crate::ports::store::PageRequest;
use crate::usecases::order_pricing::OrderTotals;

// ── Requests ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProductCreateBody {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

/// Full update. A body id, if present, must match the path.
#[derive(Debug, Deserialize)]
pub struct ProductPutBody {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductPatchBody {
    #[serde(default)]
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LineItemInput {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct OrderCreateBody {
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub order_details: Vec<LineItemInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderPatchBody {
    #[serde(default)]
    pub id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LineItemCreateBody {
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LineItemPatchBody {
    pub order_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

// ── Responses ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            created: product.created,
            updated: product.updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub id: i64,
    pub order: String,
    pub product: String,
    pub quantity: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<LineItem> for LineItemResponse {
    fn from(item: LineItem) -> Self {
        Self {
            id: item.id,
            order: item.order_id,
            product: item.product_id,
            quantity: item.quantity,
            created: item.created,
            updated: item.updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub date: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub total_pesos: Option<f64>,
    pub total_usd: Option<f64>,
    pub order_details: Vec<LineItemResponse>,
}

impl OrderResponse {
    pub fn from_parts(order: OrderWithItems, totals: OrderTotals) -> Self {
        Self {
            id: order.order.id,
            date: order.order.date,
            created: order.order.created,
            updated: order.order.updated,
            total_pesos: totals.local,
            total_usd: totals.foreign,
            order_details: order
                .lines
                .into_iter()
                .map(|line| LineItemResponse::from(line.item))
                .collect(),
        }
    }
}

// ── Pagination ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Resolve query parameters against configured defaults and caps.
pub fn page_request(config: PaginationConfig, query: &PageQuery) -> PageRequest {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(config.page_size)
        .clamp(1, config.max_page_size);
    PageRequest { page, page_size }
}

/// Page-number envelope with relative next/previous links.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(path: &str, page: PageRequest, count: i64, results: Vec<T>) -> Self {
        let shown = i64::from(page.page) * i64::from(page.page_size);
        let next = (shown < count)
            .then(|| format!("{path}?page={}&page_size={}", page.page + 1, page.page_size));
        let previous = (page.page > 1)
            .then(|| format!("{path}?page={}&page_size={}", page.page - 1, page.page_size));
        Self { count, next, previous, results }
    }
}

// ── Dates ───────────────────────────────────────────────────

/// Parse a request date: RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare
/// date (taken as midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    Err(ValidationError::BadDate)
}
