//! HTTP Server - Application State, Router, and Serve Loop
//!
//! Wires the store, the order usecases, and the metrics registry into
//! one `AppState`, builds the axum router, and runs it with graceful
//! shutdown on SIGINT.
//!
//! Verb policy is encoded in the route table itself: `PUT` on an
//! order and `GET` on a line item are simply absent, and axum answers
//! 405 for any method a matched path does not register.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::Router;
use axum::extract::{MatchedPath, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use tracing::{error, info};

use super::{line_items, orders, products};
use crate::adapters::metrics::MetricsRegistry;
use crate::config::{AppConfig, PaginationConfig};
use crate::ports::rate_feed::RateFeed;
use crate::ports::store::Store;
use crate::usecases::{OrderAssembler, OrderPricer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub assembler: Arc<OrderAssembler>,
    pub pricer: Arc<OrderPricer>,
    pub metrics: Arc<MetricsRegistry>,
    pub pagination: PaginationConfig,
    metrics_enabled: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        feed: Arc<dyn RateFeed>,
        metrics: Arc<MetricsRegistry>,
        config: &AppConfig,
    ) -> Self {
        let assembler = Arc::new(OrderAssembler::new(Arc::clone(&store)));
        let pricer = Arc::new(OrderPricer::new(feed, config.exchange.quote_label.clone()));
        Self {
            store,
            assembler,
            pricer,
            metrics,
            pagination: config.pagination,
            metrics_enabled: config.metrics.enabled,
        }
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let metrics = Arc::clone(&state.metrics);
    let mut router = Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness));
    if state.metrics_enabled {
        router = router.route("/metrics", get(metrics_text));
    }
    router
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/:id",
            get(products::retrieve)
                .put(products::replace)
                .patch(products::patch)
                .delete(products::remove),
        )
        .route("/api/orders", get(orders::list).post(orders::create))
        // No PUT: order ids must not be fully replaceable.
        .route(
            "/api/orders/:id",
            get(orders::retrieve).patch(orders::patch).delete(orders::remove),
        )
        // No GET: line items have no index or detail view.
        .route("/api/order-details", post(line_items::create))
        .route(
            "/api/order-details/:id",
            put(line_items::replace)
                .patch(line_items::patch)
                .delete(line_items::remove),
        )
        .layer(middleware::from_fn_with_state(metrics, track_requests))
        .with_state(state)
}

/// Bind and serve until SIGINT.
pub async fn serve(state: AppState, bind_address: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!(address = %bind_address, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("SIGINT received, shutting down");
        })
        .await?;
    Ok(())
}

/// Liveness probe: 200 whenever the process is up.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: 200 only while the store answers queries.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.store.is_healthy().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

/// Prometheus text exposition.
async fn metrics_text(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => {
            ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response()
        }
        Err(err) => {
            error!(error = %err, "metrics render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Count and time every request, labeled by the matched route template.
async fn track_requests(
    State(metrics): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_owned();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_owned(), |path| path.as_str().to_owned());

    let start = Instant::now();
    let response = next.run(request).await;
    metrics.observe_request(&method, &route, response.status().as_u16(), start.elapsed());
    response
}
