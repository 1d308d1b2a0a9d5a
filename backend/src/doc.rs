//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the address and health endpoints together with the
//! schema wrappers for domain types ([`ErrorSchema`], [`ErrorCodeSchema`]).
//! The document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary.

use crate::inbound::http::addresses::AddressPayload;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Address book API",
        description = "Bounded per-user address collections: append and home-address overwrite."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::addresses::add_address,
        crate::inbound::http::addresses::edit_home_address,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(AddressPayload, ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "addresses", description = "Mutations of a user's address collection"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
