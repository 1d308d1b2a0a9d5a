//! Process-local adapters used when no database is configured and in tests.

mod in_memory_address_store;

pub use in_memory_address_store::InMemoryAddressStore;
