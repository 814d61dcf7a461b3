//! Catalog and order entities.
//!
//! Defines the persisted resource types (products, orders, line items),
//! the draft/patch shapes requests are mapped into, and the field-level
//! constraints every write must satisfy before it reaches the store.
//!
//! Identifiers are externally assigned strings (primary keys chosen by
//! the caller); only line items carry a store-assigned surrogate id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Maximum length of an externally assigned identifier.
pub const MAX_ID_LEN: usize = 20;

/// Maximum length of a product name.
pub const MAX_NAME_LEN: usize = 50;

// ────────────────────────────────────────────
// Persisted entities
// ────────────────────────────────────────────

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Externally assigned identifier (primary key).
    pub id: String,
    pub name: String,
    /// Unit price in local currency, never negative.
    pub price: f64,
    /// Units available, never negative. Line items validate against
    /// this value but do not consume it.
    pub stock: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// An order header. Owns its line items (cascade delete); an order
/// with zero line items is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Externally assigned identifier (primary key).
    pub id: String,
    /// Order date, defaults to creation time.
    pub date: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// One (product, quantity) entry belonging to exactly one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Store-assigned surrogate key.
    pub id: i64,
    pub order_id: String,
    pub product_id: String,
    /// Always >= 1 and <= the product's stock at validation time.
    pub quantity: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A line item joined with the unit price of its product, as loaded
/// for total computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item: LineItem,
    pub unit_price: f64,
}

/// An order together with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

// ────────────────────────────────────────────
// Drafts and patches (request shapes)
// ────────────────────────────────────────────

/// A product to be created.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

/// Full replacement of a product's mutable fields.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

/// Partial update of a product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// An order header to be created. `date` falls back to creation time.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: String,
    pub date: Option<DateTime<Utc>>,
}

/// Partial update of an order.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub date: Option<DateTime<Utc>>,
}

/// A line item proposed for an order, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
    pub product_id: String,
    pub quantity: i64,
}

/// A standalone line-item create or full update.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
}

/// Partial update of a line item. Unchanged fields keep their
/// persisted values and are substituted back in before revalidation.
#[derive(Debug, Clone, Default)]
pub struct LineItemPatch {
    pub order_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

// ────────────────────────────────────────────
// Field-level constraints
// ────────────────────────────────────────────

fn check_id(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError::Empty { field });
    } else if value.len() > MAX_ID_LEN {
        errors.push(ValidationError::TooLong {
            field,
            max: MAX_ID_LEN,
        });
    }
}

fn check_name(value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError::Empty { field: "name" });
    } else if value.len() > MAX_NAME_LEN {
        errors.push(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LEN,
        });
    }
}

fn check_price(value: f64, errors: &mut Vec<ValidationError>) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ValidationError::Negative { field: "price" });
    }
}

fn check_stock(value: i64, errors: &mut Vec<ValidationError>) {
    if value < 0 {
        errors.push(ValidationError::Negative { field: "stock" });
    }
}

fn check_quantity(value: i64, errors: &mut Vec<ValidationError>) {
    if value < 1 {
        errors.push(ValidationError::BelowMin {
            field: "quantity",
            min: 1,
        });
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

impl NewProduct {
    /// Check all field constraints, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id("id", &self.id, &mut errors);
        check_name(&self.name, &mut errors);
        check_price(self.price, &mut errors);
        check_stock(self.stock, &mut errors);
        finish(errors)
    }
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_name(&self.name, &mut errors);
        check_price(self.price, &mut errors);
        check_stock(self.stock, &mut errors);
        finish(errors)
    }
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(price) = self.price {
            check_price(price, &mut errors);
        }
        if let Some(stock) = self.stock {
            check_stock(stock, &mut errors);
        }
        finish(errors)
    }
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id("id", &self.id, &mut errors);
        finish(errors)
    }
}

impl LineItemDraft {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id("product_id", &self.product_id, &mut errors);
        check_quantity(self.quantity, &mut errors);
        finish(errors)
    }
}

impl NewLineItem {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_id("order_id", &self.order_id, &mut errors);
        check_id("product_id", &self.product_id, &mut errors);
        check_quantity(self.quantity, &mut errors);
        finish(errors)
    }
}

impl LineItemPatch {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Some(order_id) = &self.order_id {
            check_id("order_id", order_id, &mut errors);
        }
        if let Some(product_id) = &self.product_id {
            check_id("product_id", product_id, &mut errors);
        }
        if let Some(quantity) = self.quantity {
            check_quantity(quantity, &mut errors);
        }
        finish(errors)
    }
}
