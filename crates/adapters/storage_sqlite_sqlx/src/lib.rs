//! # arthur-adapter-storage-sqlite-sqlx
//!
//! `SQLite` implementation of the device-state store using
//! [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement `arthur-app::ports::DeviceStateStore` on a local table
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//!
//! ## Dependency rule
//! Depends on `arthur-app` (for port traits) and `arthur-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod state_store;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use state_store::{SqliteStateStore, StoredState};
