//! Stock validation.
//!
//! A requested quantity may never exceed the product's current stock.
//! The check is read-only; stock is a catalog attribute and is not
//! consumed by line items. Callers substitute persisted values for
//! unchanged fields before invoking it on an update.

use super::catalog::Product;
use super::error::ValidationError;

/// Confirm that `requested` units of `product` can be ordered.
///
/// Fails when `requested > product.stock`, carrying the requested
/// quantity, the product name, and the quantity still available.
pub fn check_stock(product: &Product, requested: i64) -> Result<(), ValidationError> {
    if requested > product.stock {
        return Err(ValidationError::InsufficientStock {
            requested,
            product: product.name.clone(),
            available: product.stock,
        });
    }
    Ok(())
}
