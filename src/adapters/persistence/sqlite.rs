//! SQLite Store — Concrete Adapter for the Store Port
//!
//! All writes that depend on reads (stock checks, per-order product
//! uniqueness, reference resolution) run inside a single transaction;
//! SQLite serializes writers, so the read-compare-persist window is
//! closed and a validation failure rolls the whole write back. An
//! order created together with its line items either commits in full
//! or leaves no trace — no provisional order row is ever observable.
//!
//! Cascades (product -> line items, order -> line items) live in the
//! schema (`ON DELETE CASCADE`), with foreign keys enabled on every
//! connection.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteExecutor, SqlitePoolOptions};

use crate::domain::catalog::{
    LineItem, LineItemDraft, LineItemPatch, NewLineItem, NewOrder, NewProduct, Order,
    OrderLine, OrderPatch, OrderWithItems, Product, ProductPatch, ProductUpdate,
};
use crate::domain::error::ValidationError;
use crate::domain::line_items::{validate_batch, validate_single};
use crate::ports::store::{Page, PageRequest, Store, StoreError};

/// SQLx/SQLite implementation of the `Store` port.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url`, enable
    /// foreign keys, and run embedded migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url: {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("failed to connect to SQLite")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("db migrate failed")?;

        Ok(Self { pool })
    }

    /// Shared line-item update path: resolve the target row from the
    /// existing one, re-check every invariant against the new target,
    /// then persist — all in one transaction.
    async fn apply_line_item_update<F>(&self, id: i64, resolve: F) -> Result<LineItem, StoreError>
    where
        F: FnOnce(&LineItem) -> NewLineItem + Send,
    {
        let mut tx = self.pool.begin().await.context("begin line item update")?;

        let existing = line_item_by_id(&mut *tx, id)
            .await
            .context("load line item failed")?
            .ok_or(StoreError::NotFound("line item"))?;
        let target = resolve(&existing);

        let order = order_by_id(&mut *tx, &target.order_id)
            .await
            .context("load order failed")?
            .ok_or_else(|| {
                StoreError::invalid(ValidationError::UnknownOrder(target.order_id.clone()))
            })?;
        let product = product_by_id(&mut *tx, &target.product_id)
            .await
            .context("load product failed")?
            .ok_or_else(|| {
                StoreError::invalid(ValidationError::UnknownProduct(target.product_id.clone()))
            })?;

        // The item's own row is excluded so it may keep its product.
        let siblings = sibling_product_ids(&mut *tx, &order.id, Some(existing.id))
            .await
            .context("load sibling line items failed")?;
        let draft = LineItemDraft {
            product_id: target.product_id.clone(),
            quantity: target.quantity,
        };
        validate_single(&order.id, &draft, &siblings, &product).map_err(StoreError::Invalid)?;

        let now = Utc::now();
        sqlx::query(
            "update order_details set order_id = ?1, product_id = ?2, quantity = ?3, updated = ?4 \
             where id = ?5",
        )
        .bind(&target.order_id)
        .bind(&target.product_id)
        .bind(target.quantity)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("update line item failed")?;

        tx.commit().await.context("commit line item update")?;
        Ok(LineItem {
            id: existing.id,
            order_id: target.order_id,
            product_id: target.product_id,
            quantity: target.quantity,
            created: existing.created,
            updated: now,
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn list_products(&self, page: PageRequest) -> Result<Page<Product>, StoreError> {
        let (count,): (i64,) = sqlx::query_as("select count(*) from products")
            .fetch_one(&self.pool)
            .await
            .context("count products failed")?;

        let rows = sqlx::query_as::<_, ProductRow>(
            "select id, name, price, stock, created, updated from products \
             order by id limit ?1 offset ?2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .context("list products failed")?;

        Ok(Page { count, results: rows.into_iter().map(product_from_row).collect() })
    }

    async fn get_product(&self, id: &str) -> Result<Product, StoreError> {
        product_by_id(&self.pool, id)
            .await
            .context("load product failed")?
            .ok_or(StoreError::NotFound("product"))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await.context("begin product create")?;

        let taken = sqlx::query_as::<_, (i64,)>("select 1 from products where id = ?1")
            .bind(&product.id)
            .fetch_optional(&mut *tx)
            .await
            .context("product id check failed")?;
        if taken.is_some() {
            return Err(StoreError::invalid(ValidationError::AlreadyExists("product")));
        }

        let now = Utc::now();
        sqlx::query(
            "insert into products (id, name, price, stock, created, updated) \
             values (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("insert product failed")?;

        tx.commit().await.context("commit product create")?;
        Ok(Product {
            id: product.id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            created: now,
            updated: now,
        })
    }

    async fn replace_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await.context("begin product replace")?;

        let existing = product_by_id(&mut *tx, id)
            .await
            .context("load product failed")?
            .ok_or(StoreError::NotFound("product"))?;

        let now = Utc::now();
        sqlx::query("update products set name = ?1, price = ?2, stock = ?3, updated = ?4 where id = ?5")
            .bind(&update.name)
            .bind(update.price)
            .bind(update.stock)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("update product failed")?;

        tx.commit().await.context("commit product replace")?;
        Ok(Product {
            id: existing.id,
            name: update.name,
            price: update.price,
            stock: update.stock,
            created: existing.created,
            updated: now,
        })
    }

    async fn patch_product(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await.context("begin product patch")?;

        let existing = product_by_id(&mut *tx, id)
            .await
            .context("load product failed")?
            .ok_or(StoreError::NotFound("product"))?;

        let name = patch.name.unwrap_or(existing.name);
        let price = patch.price.unwrap_or(existing.price);
        let stock = patch.stock.unwrap_or(existing.stock);

        let now = Utc::now();
        sqlx::query("update products set name = ?1, price = ?2, stock = ?3, updated = ?4 where id = ?5")
            .bind(&name)
            .bind(price)
            .bind(stock)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("update product failed")?;

        tx.commit().await.context("commit product patch")?;
        Ok(Product {
            id: existing.id,
            name,
            price,
            stock,
            created: existing.created,
            updated: now,
        })
    }

    async fn delete_product(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("delete from products where id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete product failed")?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("product"));
        }
        Ok(())
    }

    async fn list_orders(&self, page: PageRequest) -> Result<Page<OrderWithItems>, StoreError> {
        let (count,): (i64,) = sqlx::query_as("select count(*) from orders")
            .fetch_one(&self.pool)
            .await
            .context("count orders failed")?;

        let rows = sqlx::query_as::<_, OrderRow>(
            "select id, \"date\", created, updated from orders order by id limit ?1 offset ?2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .context("list orders failed")?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let order = order_from_row(row);
            let lines = order_lines(&self.pool, &order.id)
                .await
                .context("load order lines failed")?;
            results.push(OrderWithItems { order, lines });
        }
        Ok(Page { count, results })
    }

    async fn get_order(&self, id: &str) -> Result<OrderWithItems, StoreError> {
        let order = order_by_id(&self.pool, id)
            .await
            .context("load order failed")?
            .ok_or(StoreError::NotFound("order"))?;
        let lines = order_lines(&self.pool, id)
            .await
            .context("load order lines failed")?;
        Ok(OrderWithItems { order, lines })
    }

    async fn create_order_with_items(
        &self,
        order: NewOrder,
        items: Vec<LineItemDraft>,
    ) -> Result<OrderWithItems, StoreError> {
        let mut tx = self.pool.begin().await.context("begin order create")?;

        let taken = sqlx::query_as::<_, (i64,)>("select 1 from orders where id = ?1")
            .bind(&order.id)
            .fetch_optional(&mut *tx)
            .await
            .context("order id check failed")?;
        if taken.is_some() {
            return Err(StoreError::invalid(ValidationError::AlreadyExists("order")));
        }

        let now = Utc::now();
        let date = order.date.unwrap_or(now);
        sqlx::query("insert into orders (id, \"date\", created, updated) values (?1, ?2, ?3, ?4)")
            .bind(&order.id)
            .bind(date)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("insert order failed")?;

        // Resolve each referenced product once, inside the transaction.
        let mut products: HashMap<String, Product> = HashMap::new();
        for draft in &items {
            if products.contains_key(&draft.product_id) {
                continue;
            }
            if let Some(product) = product_by_id(&mut *tx, &draft.product_id)
                .await
                .context("load product failed")?
            {
                products.insert(draft.product_id.clone(), product);
            }
        }

        // A just-inserted order has no persisted line items yet.
        let existing = HashSet::new();
        // On failure the transaction is dropped and rolls back: the
        // order row never becomes visible.
        validate_batch(&order.id, &items, &existing, &products).map_err(StoreError::Invalid)?;

        for draft in &items {
            sqlx::query(
                "insert into order_details (order_id, product_id, quantity, created, updated) \
                 values (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&order.id)
            .bind(&draft.product_id)
            .bind(draft.quantity)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("insert line item failed")?;
        }

        let lines = order_lines(&mut *tx, &order.id)
            .await
            .context("load order lines failed")?;
        tx.commit().await.context("commit order create")?;

        Ok(OrderWithItems {
            order: Order { id: order.id, date, created: now, updated: now },
            lines,
        })
    }

    async fn patch_order(
        &self,
        id: &str,
        patch: OrderPatch,
    ) -> Result<OrderWithItems, StoreError> {
        let mut tx = self.pool.begin().await.context("begin order patch")?;

        let existing = order_by_id(&mut *tx, id)
            .await
            .context("load order failed")?
            .ok_or(StoreError::NotFound("order"))?;

        let date = patch.date.unwrap_or(existing.date);
        let now = Utc::now();
        sqlx::query("update orders set \"date\" = ?1, updated = ?2 where id = ?3")
            .bind(date)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("update order failed")?;

        let lines = order_lines(&mut *tx, id)
            .await
            .context("load order lines failed")?;
        tx.commit().await.context("commit order patch")?;

        Ok(OrderWithItems {
            order: Order {
                id: existing.id,
                date,
                created: existing.created,
                updated: now,
            },
            lines,
        })
    }

    async fn delete_order(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("delete from orders where id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete order failed")?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("order"));
        }
        Ok(())
    }

    async fn create_line_item(&self, item: NewLineItem) -> Result<LineItem, StoreError> {
        let mut tx = self.pool.begin().await.context("begin line item create")?;

        let order = order_by_id(&mut *tx, &item.order_id)
            .await
            .context("load order failed")?
            .ok_or_else(|| {
                StoreError::invalid(ValidationError::UnknownOrder(item.order_id.clone()))
            })?;
        let product = product_by_id(&mut *tx, &item.product_id)
            .await
            .context("load product failed")?
            .ok_or_else(|| {
                StoreError::invalid(ValidationError::UnknownProduct(item.product_id.clone()))
            })?;

        let siblings = sibling_product_ids(&mut *tx, &order.id, None)
            .await
            .context("load sibling line items failed")?;
        let draft = LineItemDraft {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        };
        validate_single(&order.id, &draft, &siblings, &product).map_err(StoreError::Invalid)?;

        let now = Utc::now();
        let result = sqlx::query(
            "insert into order_details (order_id, product_id, quantity, created, updated) \
             values (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&order.id)
        .bind(&draft.product_id)
        .bind(draft.quantity)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("insert line item failed")?;

        let id = result.last_insert_rowid();
        tx.commit().await.context("commit line item create")?;

        Ok(LineItem {
            id,
            order_id: order.id,
            product_id: draft.product_id,
            quantity: draft.quantity,
            created: now,
            updated: now,
        })
    }

    async fn replace_line_item(
        &self,
        id: i64,
        item: NewLineItem,
    ) -> Result<LineItem, StoreError> {
        self.apply_line_item_update(id, move |_| item).await
    }

    async fn patch_line_item(
        &self,
        id: i64,
        patch: LineItemPatch,
    ) -> Result<LineItem, StoreError> {
        // Unchanged fields keep their persisted values before the
        // invariants are re-checked against the merged target.
        self.apply_line_item_update(id, move |existing| NewLineItem {
            order_id: patch.order_id.unwrap_or_else(|| existing.order_id.clone()),
            product_id: patch.product_id.unwrap_or_else(|| existing.product_id.clone()),
            quantity: patch.quantity.unwrap_or(existing.quantity),
        })
        .await
    }

    async fn delete_line_item(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("delete from order_details where id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete line item failed")?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("line item"));
        }
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query_as::<_, (i64,)>("select 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// ── Row mapping helpers ─────────────────────────────────────

type ProductRow = (String, String, f64, i64, DateTime<Utc>, DateTime<Utc>);
type OrderRow = (String, DateTime<Utc>, DateTime<Utc>, DateTime<Utc>);
type LineRow = (i64, String, String, i64, DateTime<Utc>, DateTime<Utc>);

fn product_from_row((id, name, price, stock, created, updated): ProductRow) -> Product {
    Product { id, name, price, stock, created, updated }
}

fn order_from_row((id, date, created, updated): OrderRow) -> Order {
    Order { id, date, created, updated }
}

async fn product_by_id(
    ex: impl SqliteExecutor<'_>,
    id: &str,
) -> sqlx::Result<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(
        "select id, name, price, stock, created, updated from products where id = ?1",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(product_from_row))
}

async fn order_by_id(ex: impl SqliteExecutor<'_>, id: &str) -> sqlx::Result<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(
        "select id, \"date\", created, updated from orders where id = ?1",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(order_from_row))
}

async fn line_item_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> sqlx::Result<Option<LineItem>> {
    let row = sqlx::query_as::<_, LineRow>(
        "select id, order_id, product_id, quantity, created, updated \
         from order_details where id = ?1",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(|(id, order_id, product_id, quantity, created, updated)| LineItem {
        id,
        order_id,
        product_id,
        quantity,
        created,
        updated,
    }))
}

/// Line items of an order joined with their product's unit price.
async fn order_lines(ex: impl SqliteExecutor<'_>, order_id: &str) -> sqlx::Result<Vec<OrderLine>> {
    let rows = sqlx::query_as::<_, (i64, String, String, i64, f64, DateTime<Utc>, DateTime<Utc>)>(
        "select d.id, d.order_id, d.product_id, d.quantity, p.price, d.created, d.updated \
         from order_details d join products p on p.id = d.product_id \
         where d.order_id = ?1 order by d.id",
    )
    .bind(order_id)
    .fetch_all(ex)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, order_id, product_id, quantity, unit_price, created, updated)| OrderLine {
            item: LineItem { id, order_id, product_id, quantity, created, updated },
            unit_price,
        })
        .collect())
}

/// Product ids already present on an order, optionally excluding one
/// line item (the one being updated).
async fn sibling_product_ids(
    ex: impl SqliteExecutor<'_>,
    order_id: &str,
    exclude: Option<i64>,
) -> sqlx::Result<Vec<String>> {
    let rows = match exclude {
        Some(item_id) => {
            sqlx::query_as::<_, (String,)>(
                "select product_id from order_details where order_id = ?1 and id <> ?2",
            )
            .bind(order_id)
            .bind(item_id)
            .fetch_all(ex)
            .await?
        }
        None => {
            sqlx::query_as::<_, (String,)>(
                "select product_id from order_details where order_id = ?1",
            )
            .bind(order_id)
            .fetch_all(ex)
            .await?
        }
    };
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
