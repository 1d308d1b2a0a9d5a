//! Builders wiring the address store into the HTTP state.

use std::sync::Arc;

use address_book::domain::ports::AddressStore;
use address_book::domain::{AddressAppendService, AddressBookPolicy, HomeAddressReplaceService};
use address_book::inbound::http::state::HttpState;
use address_book::outbound::persistence::DieselAddressStore;

use super::config::StoreBackend;

fn services_over<S>(store: Arc<S>, policy: AddressBookPolicy) -> HttpState
where
    S: AddressStore + 'static,
{
    HttpState::new(
        Arc::new(AddressAppendService::new(Arc::clone(&store), policy)),
        Arc::new(HomeAddressReplaceService::new(store, policy)),
    )
}

/// Build the HTTP state for the configured store backend.
pub(super) fn build_http_state(store: &StoreBackend, policy: AddressBookPolicy) -> HttpState {
    match store {
        StoreBackend::InMemory(store) => services_over(Arc::clone(store), policy),
        StoreBackend::Postgres(pool) => {
            services_over(Arc::new(DieselAddressStore::new(pool.clone())), policy)
        }
    }
}
