//! Outbound adapters implementing the domain's driven ports.
//!
//! - **memory**: process-local store used for local runs and tests
//! - **persistence**: PostgreSQL store using Diesel
//!
//! Adapters translate between domain types and storage representations and
//! carry no business rules of their own.

pub mod memory;
pub mod persistence;
