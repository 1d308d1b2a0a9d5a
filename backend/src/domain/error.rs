//! Domain-level error type.
//!
//! Errors here are transport agnostic. The HTTP adapter maps them to status
//! codes and JSON envelopes; nothing in this module knows about Actix.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The user or the addressed element does not exist.
    NotFound,
    /// A business rule refused the mutation (bound reached, duplicate id).
    Conflict,
    /// The document store could not be reached in time.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Error payload returned by domain services.
///
/// # Examples
/// ```
/// use address_book::domain::{Error, ErrorCode};
///
/// let err = Error::conflict("address limit reached");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.message(), "address limit reached");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    details: Option<Value>,
}

impl Error {
    /// Create an error, capturing the trace identifier in scope (if any).
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier explicitly.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use address_book::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::conflict("address limit reached")
    ///     .with_details(json!({ "code": "limit_exceeded", "maxAddresses": 2 }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Value of the `code` entry in [`Error::details`], when present.
    pub fn detail_code(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|details| details.get("code"))
            .and_then(Value::as_str)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
