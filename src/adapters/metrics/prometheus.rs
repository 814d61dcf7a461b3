//! Prometheus Metrics Registry - API Observability
//!
//! Registers and exposes Prometheus metrics for the HTTP surface.
//! All metrics follow the naming convention `storefront_*` and label
//! requests by method and matched route template (never raw paths, to
//! keep label cardinality bounded).

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Centralized Prometheus metrics for the API.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Total HTTP requests, labeled by method, route, and status.
    pub http_requests: IntCounterVec,
    /// Request latency in seconds, labeled by method and route.
    pub http_latency_seconds: HistogramVec,
    /// Exchange-rate feed failures (unreachable feed or unusable quote).
    pub upstream_failures: IntCounter,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("storefront_http_requests_total", "Total HTTP requests"),
            &["method", "route", "status"],
        )?;

        let http_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "storefront_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0]),
            &["method", "route"],
        )?;

        let upstream_failures = IntCounter::new(
            "storefront_upstream_failures_total",
            "Exchange-rate feed failures",
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_latency_seconds.clone()))?;
        registry.register(Box::new(upstream_failures.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_latency_seconds,
            upstream_failures,
        })
    }

    /// Record one finished request.
    pub fn observe_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        self.http_requests
            .with_label_values(&[method, route, &status.to_string()])
            .inc();
        self.http_latency_seconds
            .with_label_values(&[method, route])
            .observe(elapsed.as_secs_f64());
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
