//! Shared wiring for address book integration suites.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use address_book::Trace;
use address_book::domain::{
    Address, AddressAppendService, AddressBookPolicy, AddressFields, AddressId,
    HomeAddressReplaceService, UserId,
};
use address_book::inbound::http::configure_addresses;
use address_book::inbound::http::state::HttpState;
use address_book::outbound::memory::InMemoryAddressStore;

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub fn fields(house: &str, street: &str, city: &str, pincode: &str) -> AddressFields {
    AddressFields {
        house: Some(house.to_owned()),
        street: Some(street.to_owned()),
        city: Some(city.to_owned()),
        pincode: Some(pincode.to_owned()),
    }
}

pub fn address(id: &str, fields: AddressFields) -> Address {
    Address::new(AddressId::new(id).expect("valid address id"), fields)
}

/// Store holding `user_id` with the given collection.
pub fn store_with(user_id: &UserId, addresses: Vec<Address>) -> Arc<InMemoryAddressStore> {
    let store = InMemoryAddressStore::new();
    assert!(store.insert_user_with_addresses(user_id.clone(), addresses));
    Arc::new(store)
}

/// Real services over `store`, bundled for the HTTP handlers.
pub fn http_state(store: &Arc<InMemoryAddressStore>, policy: AddressBookPolicy) -> HttpState {
    HttpState::new(
        Arc::new(AddressAppendService::new(Arc::clone(store), policy)),
        Arc::new(HomeAddressReplaceService::new(Arc::clone(store), policy)),
    )
}

/// Application with tracing and the address routes, as served in production.
pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure_addresses)
}
