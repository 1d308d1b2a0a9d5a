//! Address book HTTP handlers.
//!
//! ```text
//! POST /addaddress?userID=..
//! PUT  /edithomeaddress?userID=..
//! ```
//!
//! Both endpoints answer a successful mutation with `200 OK` and a bare JSON
//! string; failures use the shared error envelope.

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Address, AddressFields, AddressId, AddressReplacement};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_address_id, parse_user_id};

/// Body returned after a successful append.
pub const ADDRESS_ADDED: &str = "Successfully added the address";
/// Body returned after a successful home-address overwrite.
pub const HOME_ADDRESS_UPDATED: &str = "Successfully updated the home address";

/// Query string shared by the address endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Identifier of the user document to mutate.
    #[serde(rename = "userID")]
    #[param(example = "64f1c2a9e4b0a1b2c3d4e5f6")]
    pub user_id: Option<String>,
}

/// Address as sent by clients.
///
/// Every text field is optional. `address_id` is generated when omitted on
/// append; on a home overwrite its absence lets the configured identity
/// policy decide.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AddressPayload {
    #[serde(default, alias = "Address_ID")]
    pub address_id: Option<String>,
    #[serde(default)]
    #[schema(example = "123 Main St")]
    pub house_name: Option<String>,
    #[serde(default)]
    #[schema(example = "Main Street")]
    pub street_name: Option<String>,
    #[serde(default)]
    #[schema(example = "Springfield")]
    pub city_name: Option<String>,
    #[serde(default)]
    #[schema(example = "12345")]
    pub pin_code: Option<String>,
}

impl AddressPayload {
    fn split(self) -> (Option<String>, AddressFields) {
        (
            self.address_id,
            AddressFields {
                house: self.house_name,
                street: self.street_name,
                city: self.city_name,
                pincode: self.pin_code,
            },
        )
    }
}

/// Append an address to the user's collection.
#[utoipa::path(
    post,
    path = "/addaddress",
    params(UserQuery),
    request_body = AddressPayload,
    responses(
        (status = 200, description = "Successfully added the address", body = String),
        (status = 400, description = "Missing userID or malformed body", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Address limit reached or address id in use",
            body = ErrorSchema),
        (status = 503, description = "Address store unavailable", body = ErrorSchema)
    ),
    tags = ["addresses"],
    operation_id = "addAddress"
)]
#[post("/addaddress")]
pub async fn add_address(
    state: web::Data<HttpState>,
    query: web::Query<UserQuery>,
    payload: web::Json<AddressPayload>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(query.into_inner().user_id)?;
    let (address_id, fields) = payload.into_inner().split();
    let address_id = parse_address_id(address_id)?.unwrap_or_else(AddressId::random);

    state
        .append
        .append(&user_id, Address::new(address_id, fields))
        .await?;
    Ok(HttpResponse::Ok().json(ADDRESS_ADDED))
}

/// Overwrite the user's home address (the first element of the collection).
#[utoipa::path(
    put,
    path = "/edithomeaddress",
    params(UserQuery),
    request_body = AddressPayload,
    responses(
        (status = 200, description = "Successfully updated the home address", body = String),
        (status = 400, description = "Missing userID or malformed body", body = ErrorSchema),
        (status = 404, description = "User not found or no home address", body = ErrorSchema),
        (status = 409, description = "Address id belongs to another address", body = ErrorSchema),
        (status = 503, description = "Address store unavailable", body = ErrorSchema)
    ),
    tags = ["addresses"],
    operation_id = "editHomeAddress"
)]
#[put("/edithomeaddress")]
pub async fn edit_home_address(
    state: web::Data<HttpState>,
    query: web::Query<UserQuery>,
    payload: web::Json<AddressPayload>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(query.into_inner().user_id)?;
    let (address_id, fields) = payload.into_inner().split();
    let replacement = AddressReplacement {
        address_id: parse_address_id(address_id)?,
        fields,
    };

    state.replace_home.replace_home(&user_id, replacement).await?;
    Ok(HttpResponse::Ok().json(HOME_ADDRESS_UPDATED))
}
