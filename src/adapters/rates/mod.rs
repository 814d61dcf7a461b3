//! Rate Feed Adapters - External Exchange-Rate Quote Sources
//!
//! Implements the `RateFeed` port against the DolarSi public HTTP API.

pub mod dolarsi;

pub use dolarsi::DolarSiClient;
