//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `Store`: relational persistence for products, orders, line items
//! - `RateFeed`: external exchange-rate quote feed

pub mod rate_feed;
pub mod store;
