//! Metrics Adapters - Prometheus Exposition
//!
//! Request counters and latency histograms for the HTTP surface plus
//! an upstream-failure counter for the exchange-rate feed, exposed on
//! `/metrics` in the Prometheus text format.

pub mod prometheus;

pub use prometheus::MetricsRegistry;
