//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{AddressId, Error, UserId, UserValidationError};

/// Query parameter naming the user whose collection is mutated.
pub(crate) const USER_ID_PARAM: &str = "userID";

pub(crate) fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Validate the `userID` query parameter.
pub(crate) fn parse_user_id(raw: Option<String>) -> Result<UserId, Error> {
    let raw = raw.ok_or_else(|| missing_field_error(USER_ID_PARAM))?;
    UserId::new(&raw).map_err(|err| {
        let code = match err {
            UserValidationError::EmptyId => "empty_user_id",
            UserValidationError::InvalidId => "invalid_user_id",
        };
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": USER_ID_PARAM,
            "code": code,
        }))
    })
}

/// Validate an optional caller-supplied address identifier.
pub(crate) fn parse_address_id(raw: Option<String>) -> Result<Option<AddressId>, Error> {
    raw.map(|value| {
        AddressId::new(value).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "address_id",
                "code": "invalid_address_id",
            }))
        })
    })
    .transpose()
}
