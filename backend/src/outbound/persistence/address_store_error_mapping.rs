//! Translation of pool and Diesel failures into [`AddressStoreError`].
//!
//! Only failures that a fresh attempt can plausibly cure are reported as
//! `Unavailable`; everything else is a `Query` failure and is not retried.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::AddressStoreError;

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> AddressStoreError {
    AddressStoreError::unavailable(error.into_message())
}

pub(crate) fn map_diesel_error(error: DieselError, operation: &'static str) -> AddressStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        other => debug!(error = %other, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AddressStoreError::unavailable(format!("{operation}: database connection closed"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            AddressStoreError::unavailable(format!("{operation}: serialization failure"))
        }
        DieselError::BrokenTransactionManager => {
            AddressStoreError::unavailable(format!("{operation}: broken transaction manager"))
        }
        DieselError::NotFound => AddressStoreError::query(format!("{operation}: row not found")),
        _ => AddressStoreError::query(format!("{operation}: database error")),
    }
}

pub(crate) fn map_document_error(error: serde_json::Error) -> AddressStoreError {
    AddressStoreError::query(format!("malformed address document: {error}"))
}
