//! Store Port - Relational Persistence Interface
//!
//! One trait covering the three persisted resources. The relational
//! invariants (stock, per-order product uniqueness, cascades) are
//! enforced by implementations INSIDE their write transactions, using
//! the domain validators, so a validation failure can never leave a
//! partial write behind.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::catalog::{
    LineItem, LineItemDraft, LineItemPatch, NewLineItem, NewOrder, NewProduct, Order,
    OrderPatch, OrderWithItems, Product, ProductPatch, ProductUpdate,
};
use crate::domain::error::ValidationError;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

/// Store failures, as seen by usecases and handlers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unknown identifier on retrieve/update/delete.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// One or more domain invariants rejected the write. The write was
    /// rolled back; nothing persisted.
    #[error("validation failed")]
    Invalid(Vec<ValidationError>),

    /// The storage backend itself failed.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Shorthand for a single-violation rejection.
    pub fn invalid(error: ValidationError) -> Self {
        Self::Invalid(vec![error])
    }
}

/// Relational persistence for the catalog and orders.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    // ── Products ────────────────────────────────────────────

    async fn list_products(&self, page: PageRequest) -> Result<Page<Product>, StoreError>;

    async fn get_product(&self, id: &str) -> Result<Product, StoreError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Full replacement of the mutable fields.
    async fn replace_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Product, StoreError>;

    async fn patch_product(&self, id: &str, patch: ProductPatch)
        -> Result<Product, StoreError>;

    /// Cascades to the product's line items.
    async fn delete_product(&self, id: &str) -> Result<(), StoreError>;

    // ── Orders ──────────────────────────────────────────────

    async fn list_orders(&self, page: PageRequest) -> Result<Page<OrderWithItems>, StoreError>;

    async fn get_order(&self, id: &str) -> Result<OrderWithItems, StoreError>;

    /// Create an order together with its initial line items as one
    /// atomic unit: the order row is inserted, the whole batch is
    /// validated against product rows read in the same transaction,
    /// and any failure rolls everything back.
    async fn create_order_with_items(
        &self,
        order: NewOrder,
        items: Vec<LineItemDraft>,
    ) -> Result<OrderWithItems, StoreError>;

    async fn patch_order(&self, id: &str, patch: OrderPatch)
        -> Result<OrderWithItems, StoreError>;

    /// Cascades to the order's line items.
    async fn delete_order(&self, id: &str) -> Result<(), StoreError>;

    // ── Line items ──────────────────────────────────────────

    async fn create_line_item(&self, item: NewLineItem) -> Result<LineItem, StoreError>;

    /// Full update; all invariants re-checked against the new target.
    async fn replace_line_item(&self, id: i64, item: NewLineItem)
        -> Result<LineItem, StoreError>;

    /// Partial update; persisted values are substituted for absent
    /// fields before revalidation.
    async fn patch_line_item(
        &self,
        id: i64,
        patch: LineItemPatch,
    ) -> Result<LineItem, StoreError>;

    async fn delete_line_item(&self, id: i64) -> Result<(), StoreError>;

    // ── Health ──────────────────────────────────────────────

    /// Whether the backend is reachable (readiness probe).
    async fn is_healthy(&self) -> bool;
}
