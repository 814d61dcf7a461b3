//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (SQLx, reqwest, axum) and hosts the inbound
//! HTTP surface. Each sub-module groups adapters by infrastructure
//! concern.
//!
//! Adapter categories:
//! - `http`: inbound JSON resource API (axum)
//! - `metrics`: Prometheus metrics export
//! - `persistence`: SQLx/SQLite implementation of the store port
//! - `rates`: exchange-rate feed client (reqwest)

pub mod http;
pub mod metrics;
pub mod persistence;
pub mod rates;
