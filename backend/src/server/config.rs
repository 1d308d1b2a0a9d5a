//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use address_book::domain::AddressBookPolicy;
use address_book::outbound::memory::InMemoryAddressStore;
use address_book::outbound::persistence::DbPool;

/// Document store backing the address services.
#[derive(Clone)]
pub enum StoreBackend {
    /// Process-local store; contents are lost on restart.
    InMemory(Arc<InMemoryAddressStore>),
    /// PostgreSQL store reached through the pool.
    Postgres(DbPool),
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InMemory(_) => "in-memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: AddressBookPolicy,
    pub(crate) store: StoreBackend,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: StoreBackend) -> Self {
        Self {
            bind_addr,
            policy: AddressBookPolicy::default(),
            store,
        }
    }

    /// Override the default address book policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AddressBookPolicy) -> Self {
        self.policy = policy;
        self
    }
}
