//! PostgreSQL persistence adapter using Diesel.
//!
//! Connections come from a `bb8` pool of `diesel-async` connections. Row
//! structs and the schema are internal; only the store, the pool and the
//! migration runner are exported.
//!
//! # Example
//!
//! ```ignore
//! use address_book::outbound::persistence::{DbPool, DieselAddressStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/address_book")).await?;
//! let store = DieselAddressStore::new(pool);
//! ```

mod address_store_error_mapping;
mod diesel_address_store;
mod migrations;
mod pool;
mod schema;

pub use diesel_address_store::DieselAddressStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
