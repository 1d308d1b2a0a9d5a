//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their shape and register under the domain type's
//! name so the generated document matches the wire format.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Missing or malformed `userID`, or an undecodable body.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Unknown user, or no home address to overwrite.
    #[schema(rename = "not_found")]
    NotFound,
    /// Collection bound reached or address id already in use.
    #[schema(rename = "conflict")]
    Conflict,
    /// The document store did not answer in time.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "address limit of 2 reached")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Machine-readable refinement such as `{"code": "limit_exceeded"}`.
    details: Option<serde_json::Value>,
}
