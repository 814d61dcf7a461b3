//! In-process scenario tests for the order endpoints.
//!
//! Orders are priced on the way out: local totals are exact sums and
//! the foreign total divides by the blue-market buy rate (182,00 in
//! the canned feed), rounded to 2 decimals.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{
    FailingFeed, FixedFeed, call, quote, router, router_with_feed, seed_order,
    seed_product,
};

#[tokio::test]
async fn test_create_order_with_items_and_totals() {
    let app = router().await;
    seed_product(&app, "p1", "Yerba", 182.0, 1000).await;

    let (status, body) = call(
        app,
        "POST",
        "/api/orders",
        Some(json!({
            "id": "12345678901234567890",
            "date": "2018-12-25",
            "order_details": [{ "product_id": "p1", "quantity": 10 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "12345678901234567890");
    assert!(body["date"].as_str().unwrap().starts_with("2018-12-25"));

    // 10 * 182.00 = 1820.00 pesos; / 182,00 blue buy rate = 10.00 usd.
    assert_eq!(body["total_pesos"], 1820.0);
    assert_eq!(body["total_usd"], 10.0);

    let details = body["order_details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["product"], "p1");
    assert_eq!(details[0]["order"], "12345678901234567890");
    assert_eq!(details[0]["quantity"], 10);
    assert!(details[0]["id"].is_i64());
}

#[tokio::test]
async fn test_create_order_insufficient_stock_persists_nothing() {
    let app = router().await;
    seed_product(&app, "p1", "Yerba", 10.0, 1000).await;

    let (status, body) = call(
        app.clone(),
        "POST",
        "/api/orders",
        Some(json!({
            "id": "o1",
            "order_details": [{ "product_id": "p1", "quantity": 7777 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"][0],
        "Cannot request 7777 of Yerba, only 1000 remain."
    );

    // The transaction rolled back: no order row survived.
    let (status, _) = call(app.clone(), "GET", "/api/orders/o1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = call(app, "GET", "/api/orders", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_create_order_duplicate_products_persists_nothing() {
    let app = router().await;
    seed_product(&app, "p1", "Yerba", 10.0, 100).await;

    let (status, body) = call(
        app.clone(),
        "POST",
        "/api/orders",
        Some(json!({
            "id": "o1",
            "order_details": [
                { "product_id": "p1", "quantity": 1 },
                { "product_id": "p1", "quantity": 2 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors: Vec<String> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap().to_string())
        .collect();
    assert!(errors.contains(&"Cannot duplicate products within the same order.".to_string()));

    let (status, _) = call(app, "GET", "/api/orders/o1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_order_unknown_product() {
    let app = router().await;

    let (status, body) = call(
        app,
        "POST",
        "/api/orders",
        Some(json!({
            "id": "o1",
            "order_details": [{ "product_id": "ghost", "quantity": 1 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "Product ghost does not exist.");
}

#[tokio::test]
async fn test_empty_order_has_null_totals() {
    // The failing feed proves no upstream call happens for an order
    // with no line items.
    let app = router_with_feed(Arc::new(FailingFeed)).await;

    let (status, body) =
        call(app, "POST", "/api/orders", Some(json!({ "id": "o1" }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total_pesos"], Value::Null);
    assert_eq!(body["total_usd"], Value::Null);
    assert!(body["order_details"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_orders_envelope_and_totals() {
    let app = router().await;
    seed_product(&app, "p1", "Yerba", 100.0, 1000).await;
    seed_order(&app, "o1", json!([{ "product_id": "p1", "quantity": 2 }])).await;
    seed_order(&app, "o2", json!([{ "product_id": "p1", "quantity": 4 }])).await;

    let (status, body) = call(app, "GET", "/api/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], Value::Null);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["total_pesos"], 200.0);
    assert_eq!(results[1]["total_pesos"], 400.0);
    // 400 / 182,00, rounded to 2 decimals.
    assert_eq!(results[1]["total_usd"], 2.20);
}

#[tokio::test]
async fn test_patch_order_date() {
    let app = router().await;
    seed_order(&app, "o1", json!([])).await;

    let (status, body) = call(
        app.clone(),
        "PATCH",
        "/api/orders/o1",
        Some(json!({ "date": "2020-03-20" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["date"].as_str().unwrap().starts_with("2020-03-20"));

    let (status, body) = call(
        app,
        "PATCH",
        "/api/orders/o1",
        Some(json!({ "id": "o2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "The id field cannot be changed.");
}

#[tokio::test]
async fn test_patch_order_bad_date_format() {
    let app = router().await;
    seed_order(&app, "o1", json!([])).await;

    let (status, body) = call(
        app,
        "PATCH",
        "/api/orders/o1",
        Some(json!({ "date": "20/03/2020" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"][0],
        "The date field has an invalid format, use YYYY-MM-DD or RFC 3339."
    );
}

#[tokio::test]
async fn test_put_on_order_is_method_not_allowed() {
    let app = router().await;
    seed_order(&app, "o1", json!([])).await;

    let (status, _) = call(
        app,
        "PUT",
        "/api/orders/o1",
        Some(json!({ "id": "o1", "date": "2020-03-20" })),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_delete_order_cascades() {
    let app = router().await;
    seed_product(&app, "p1", "Yerba", 10.0, 100).await;
    let body = seed_order(&app, "o1", json!([{ "product_id": "p1", "quantity": 1 }])).await;
    let item_id = body["order_details"][0]["id"].as_i64().unwrap();

    let (status, _) = call(app.clone(), "DELETE", "/api/orders/o1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(app.clone(), "GET", "/api/orders/o1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The cascade removed the line item as well.
    let (status, _) = call(
        app,
        "DELETE",
        &format!("/api/order-details/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feed_outage_surfaces_as_bad_gateway() {
    let app = router_with_feed(Arc::new(FailingFeed)).await;
    seed_product(&app, "p1", "Yerba", 10.0, 100).await;

    // Assemble the order without touching the feed, then add an item.
    let (status, _) =
        call(app.clone(), "POST", "/api/orders", Some(json!({ "id": "o1" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call(
        app.clone(),
        "POST",
        "/api/order-details",
        Some(json!({ "order_id": "o1", "product_id": "p1", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(app, "GET", "/api/orders/o1", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("exchange rate feed unavailable")
    );
}

#[tokio::test]
async fn test_missing_quote_surfaces_as_bad_gateway() {
    let app = router_with_feed(Arc::new(FixedFeed(vec![quote(
        "Dolar Oficial",
        "98,53",
    )])))
    .await;
    seed_product(&app, "p1", "Yerba", 10.0, 100).await;

    let (status, body) = call(
        app,
        "POST",
        "/api/orders",
        Some(json!({
            "id": "o1",
            "order_details": [{ "product_id": "p1", "quantity": 1 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("no quote named \"Dolar Blue\"")
    );
}
