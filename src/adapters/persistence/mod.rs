//! Persistence Adapters - SQLx-backed Relational Store
//!
//! Implements the `Store` port on SQLite via SQLx: embedded
//! migrations, foreign-key cascades, and write transactions that
//! run the domain validators against rows read in the same
//! transaction before anything persists.

pub mod sqlite;

pub use sqlite::SqliteStore;
