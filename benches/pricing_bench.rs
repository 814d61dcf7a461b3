//! Criterion benchmarks for the pricing and validation hot paths.

use std::collections::{HashMap, HashSet};
use std::hint::black_box;

use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};

use storefront_backend::domain::catalog::{LineItem, LineItemDraft, OrderLine, Product};
use storefront_backend::domain::line_items::validate_batch;
use storefront_backend::domain::pricing::{CurrencyQuote, buy_rate, total_local};

fn make_lines(count: i64) -> Vec<OrderLine> {
    let now = Utc::now();
    (0..count)
        .map(|index| OrderLine {
            item: LineItem {
                id: index,
                order_id: "o1".to_string(),
                product_id: format!("p{index}"),
                quantity: index % 7 + 1,
                created: now,
                updated: now,
            },
            unit_price: (index % 100) as f64 + 0.99,
        })
        .collect()
}

fn bench_total_local(c: &mut Criterion) {
    let lines = make_lines(100);
    c.bench_function("total_local_100_lines", |b| {
        b.iter(|| total_local(black_box(&lines)))
    });
}

fn bench_validate_batch(c: &mut Criterion) {
    let now = Utc::now();
    let mut products = HashMap::new();
    let mut drafts = Vec::new();
    for index in 0..50 {
        let id = format!("p{index}");
        products.insert(
            id.clone(),
            Product {
                id: id.clone(),
                name: format!("Product {index}"),
                price: 10.0,
                stock: 1_000,
                created: now,
                updated: now,
            },
        );
        drafts.push(LineItemDraft { product_id: id, quantity: index + 1 });
    }
    let existing = HashSet::new();

    c.bench_function("validate_batch_50_items", |b| {
        b.iter(|| {
            validate_batch(
                black_box("o1"),
                black_box(&drafts),
                black_box(&existing),
                black_box(&products),
            )
        })
    });
}

fn bench_buy_rate(c: &mut Criterion) {
    let quotes: Vec<CurrencyQuote> = (0..20)
        .map(|index| CurrencyQuote {
            name: format!("Dolar {index}"),
            buy: format!("{},{:02}", 90 + index, index),
            sell: format!("{},{:02}", 95 + index, index),
        })
        .collect();

    c.bench_function("buy_rate_scan_20_quotes", |b| {
        b.iter(|| buy_rate(black_box(&quotes), black_box("Dolar 19")))
    });
}

criterion_group!(benches, bench_total_local, bench_validate_batch, bench_buy_rate);
criterion_main!(benches);
