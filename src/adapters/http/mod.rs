//! HTTP Adapter - Inbound JSON API
//!
//! The axum-based resource API: router construction, request/response
//! DTOs, pagination envelope, and the single place where domain and
//! port errors map to HTTP statuses. Disabled verbs (PUT on orders,
//! GET on line items) are simply not routed, so axum answers them
//! with 405 Method Not Allowed.
//!
//! Sub-modules:
//! - `server`: application state, router, serve loop
//! - `products` / `orders` / `line_items`: resource handlers
//! - `types`: request/response DTOs and pagination
//! - `error`: error-to-status mapping

pub mod error;
pub mod line_items;
pub mod orders;
pub mod products;
pub mod server;
pub mod types;

pub use server::{AppState, build_router, serve};
