//! Validation error taxonomy.
//!
//! Every rule the API can reject a request for, with the exact
//! user-facing message. Handlers collect these into a single 400
//! response body, one entry per offending field or line item.

use thiserror::Error;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Requested quantity exceeds the product's available stock.
    #[error("Cannot request {requested} of {product}, only {available} remain.")]
    InsufficientStock {
        requested: i64,
        product: String,
        available: i64,
    },

    /// The same product appears more than once in one request batch.
    #[error("Cannot duplicate products within the same order.")]
    DuplicateProductInRequest,

    /// The order already has a line item for this product.
    #[error("Another line item with product {product_id} already exists for order {order_id}.")]
    ProductAlreadyOnOrder {
        product_id: String,
        order_id: String,
    },

    /// A line item references a product id that does not exist.
    #[error("Product {0} does not exist.")]
    UnknownProduct(String),

    /// A line item references an order id that does not exist.
    #[error("Order {0} does not exist.")]
    UnknownOrder(String),

    /// A create used a primary key that is already taken.
    #[error("A {0} with this id already exists.")]
    AlreadyExists(&'static str),

    /// Updates may not move a row to a different primary key.
    #[error("The id field cannot be changed.")]
    ImmutableId,

    #[error("The {field} field must not be empty.")]
    Empty { field: &'static str },

    #[error("The {field} field must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error("The {field} field must be at least {min}.")]
    BelowMin { field: &'static str, min: i64 },

    #[error("The {field} field must be a non-negative number.")]
    Negative { field: &'static str },

    #[error("The date field has an invalid format, use YYYY-MM-DD or RFC 3339.")]
    BadDate,
}
