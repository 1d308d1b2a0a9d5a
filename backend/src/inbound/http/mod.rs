//! HTTP inbound adapter exposing the address book endpoints.

pub mod addresses;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the address endpoints together with extractor configuration
/// that reports malformed input through the shared error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use address_book::inbound::http::{configure_addresses, state::HttpState};
///
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::default()))
///     .configure(configure_addresses);
/// ```
pub fn configure_addresses(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(addresses::add_address)
        .service(addresses::edit_home_address);
}
