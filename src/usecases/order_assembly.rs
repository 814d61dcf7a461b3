//! Order Assembly - Create an Order with its Initial Line Items
//!
//! Field-level constraints are checked up front, then the store
//! persists the order row and the whole batch inside one transaction
//! (the store validates stock and product uniqueness against rows read
//! in that same transaction). Either the order and every line item
//! commit together, or nothing does - there is no observable
//! provisional state and no compensating delete.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::catalog::{LineItemDraft, NewOrder, OrderWithItems};
use crate::ports::store::{Store, StoreError};

/// Creates orders together with their initial line items.
pub struct OrderAssembler {
    store: Arc<dyn Store>,
}

impl OrderAssembler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create `order` and its `items` as a single logical unit.
    ///
    /// Aggregates every field-level violation across the order header
    /// and all drafts before touching the store; relational violations
    /// (stock, uniqueness, unknown references) come back from the
    /// store's transaction the same way, one entry per offending item.
    #[instrument(skip(self, order, items), fields(order_id = %order.id, items = items.len()))]
    pub async fn create(
        &self,
        order: NewOrder,
        items: Vec<LineItemDraft>,
    ) -> Result<OrderWithItems, StoreError> {
        let mut errors = Vec::new();
        if let Err(errs) = order.validate() {
            errors.extend(errs);
        }
        for item in &items {
            if let Err(errs) = item.validate() {
                errors.extend(errs);
            }
        }
        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }

        let created = self.store.create_order_with_items(order, items).await?;
        info!(
            order_id = %created.order.id,
            lines = created.lines.len(),
            "order assembled"
        );
        Ok(created)
    }
}
