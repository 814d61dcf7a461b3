//! Line-item validation.
//!
//! Two explicit operations, selected by the caller's intent: a batch
//! check for order creation and a single-item check for standalone
//! creates and updates. Both enforce product uniqueness per order and
//! delegate quantity checks to the stock validator, and both report
//! every violation they find rather than stopping at the first.

use std::collections::{HashMap, HashSet};

use super::catalog::{LineItemDraft, Product};
use super::error::ValidationError;
use super::stock::check_stock;

/// Validate a batch of proposed line items for one order.
///
/// Checks, in order:
/// 1. Intra-batch uniqueness: no product id may appear twice in `drafts`.
/// 2. Cross-batch uniqueness: no draft's product may already be present
///    among the order's persisted line items (`existing`).
/// 3. Per item: the product must exist in `products` and have enough
///    stock for the requested quantity.
///
/// Returns all collected violations; callers persist nothing unless the
/// whole batch passes.
pub fn validate_batch(
    order_id: &str,
    drafts: &[LineItemDraft],
    existing: &HashSet<String>,
    products: &HashMap<String, Product>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let distinct: HashSet<&str> = drafts.iter().map(|d| d.product_id.as_str()).collect();
    if distinct.len() != drafts.len() {
        errors.push(ValidationError::DuplicateProductInRequest);
    }

    for draft in drafts {
        if existing.contains(&draft.product_id) {
            errors.push(ValidationError::ProductAlreadyOnOrder {
                product_id: draft.product_id.clone(),
                order_id: order_id.to_string(),
            });
        }
        match products.get(&draft.product_id) {
            Some(product) => {
                if let Err(err) = check_stock(product, draft.quantity) {
                    errors.push(err);
                }
            }
            None => errors.push(ValidationError::UnknownProduct(draft.product_id.clone())),
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate one proposed line item against its target order.
///
/// `other_product_ids` holds the products of the order's persisted line
/// items, excluding the item being updated (if any), so an item may keep
/// its own product across an update.
pub fn validate_single(
    order_id: &str,
    draft: &LineItemDraft,
    other_product_ids: &[String],
    product: &Product,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if other_product_ids.iter().any(|id| id == &draft.product_id) {
        errors.push(ValidationError::ProductAlreadyOnOrder {
            product_id: draft.product_id.clone(),
            order_id: order_id.to_string(),
        });
    }
    if let Err(err) = check_stock(product, draft.quantity) {
        errors.push(err);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: 10.0,
            stock,
            created: now,
            updated: now,
        }
    }

    fn draft(product_id: &str, quantity: i64) -> LineItemDraft {
        LineItemDraft { product_id: product_id.to_string(), quantity }
    }

    fn catalog(entries: &[(&str, i64)]) -> HashMap<String, Product> {
        entries
            .iter()
            .map(|(id, stock)| ((*id).to_string(), product(id, *stock)))
            .collect()
    }

    #[test]
    fn test_batch_accepts_distinct_in_stock_products() {
        let products = catalog(&[("p1", 10), ("p2", 5)]);
        let drafts = vec![draft("p1", 10), draft("p2", 1)];
        assert!(validate_batch("o1", &drafts, &HashSet::new(), &products).is_ok());
    }

    #[test]
    fn test_batch_rejects_duplicate_product() {
        let products = catalog(&[("p1", 10)]);
        let drafts = vec![draft("p1", 1), draft("p1", 2)];
        let errors = validate_batch("o1", &drafts, &HashSet::new(), &products).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateProductInRequest));
    }

    #[test]
    fn test_batch_rejects_product_already_on_order() {
        let products = catalog(&[("p1", 10)]);
        let existing: HashSet<String> = ["p1".to_string()].into();
        let errors =
            validate_batch("o1", &[draft("p1", 1)], &existing, &products).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ProductAlreadyOnOrder {
                product_id: "p1".to_string(),
                order_id: "o1".to_string(),
            }]
        );
    }

    #[test]
    fn test_batch_rejects_unknown_product() {
        let products = catalog(&[("p1", 10)]);
        let errors =
            validate_batch("o1", &[draft("ghost", 1)], &HashSet::new(), &products).unwrap_err();
        assert_eq!(errors, vec![ValidationError::UnknownProduct("ghost".to_string())]);
    }

    #[test]
    fn test_batch_collects_every_violation() {
        let products = catalog(&[("p1", 2)]);
        // Duplicate pair AND both entries over stock.
        let drafts = vec![draft("p1", 5), draft("p1", 9)];
        let errors = validate_batch("o1", &drafts, &HashSet::new(), &products).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::DuplicateProductInRequest));
    }

    #[test]
    fn test_single_allows_keeping_own_product() {
        // Updating an item's quantity: its own product is excluded from
        // the comparison set, so no duplicate error.
        let p = product("p1", 10);
        assert!(validate_single("o1", &draft("p1", 3), &[], &p).is_ok());
    }

    #[test]
    fn test_single_rejects_product_held_by_sibling() {
        let p = product("p1", 10);
        let others = vec!["p1".to_string()];
        let errors = validate_single("o1", &draft("p1", 3), &others, &p).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ProductAlreadyOnOrder {
                product_id: "p1".to_string(),
                order_id: "o1".to_string(),
            }]
        );
    }

    #[test]
    fn test_single_checks_stock() {
        let p = product("p1", 2);
        let errors = validate_single("o1", &draft("p1", 3), &[], &p).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InsufficientStock {
                requested: 3,
                product: "Product p1".to_string(),
                available: 2,
            }]
        );
    }
}
