//! Deadline and retry handling shared by the address book services.
//!
//! Every store call runs under the policy's deadline. A call that times out
//! or reports [`AddressStoreError::Unavailable`] is retried with jittered
//! exponential backoff until the attempt budget is spent; every other outcome
//! is returned immediately.

use std::future::Future;

use serde_json::json;
use tracing::{debug, warn};

use super::ports::AddressStoreError;
use super::{AddressBookPolicy, Error, UserId};

/// Details code for a missing user document.
pub const USER_NOT_FOUND: &str = "user_not_found";
/// Details code for an append refused by the collection bound.
pub const LIMIT_EXCEEDED: &str = "limit_exceeded";
/// Details code for a home overwrite on an empty collection.
pub const EMPTY_ADDRESS_COLLECTION: &str = "empty_address_collection";
/// Details code for an append whose identifier is already in use.
pub const DUPLICATE_ADDRESS_ID: &str = "duplicate_address_id";

/// A single logical store operation executed under an [`AddressBookPolicy`].
pub(crate) struct StoreCall<'a> {
    policy: &'a AddressBookPolicy,
    operation: &'static str,
    user_id: &'a UserId,
}

impl<'a> StoreCall<'a> {
    pub(crate) fn new(
        policy: &'a AddressBookPolicy,
        operation: &'static str,
        user_id: &'a UserId,
    ) -> Self {
        Self {
            policy,
            operation,
            user_id,
        }
    }

    /// Run `attempt_fn` until it succeeds, fails permanently or exhausts the
    /// retry budget. The closure receives the 1-based attempt number.
    pub(crate) async fn run<T, F, Fut>(&self, mut attempt_fn: F) -> Result<T, AddressStoreError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AddressStoreError>>,
    {
        let retry = self.policy.retry();
        let max_attempts = retry.max_attempts.max(1);
        let timeout = self.policy.store_timeout();

        let mut attempt = 1;
        loop {
            let outcome = match tokio::time::timeout(timeout, attempt_fn(attempt)).await {
                Ok(result) => result,
                Err(_) => Err(AddressStoreError::unavailable(format!(
                    "{} exceeded the {}ms deadline",
                    self.operation,
                    timeout.as_millis()
                ))),
            };

            match outcome {
                Err(error) if error.is_transient() && attempt < max_attempts => {
                    let delay = retry.jittered_delay(attempt);
                    warn!(
                        operation = self.operation,
                        user_id = %self.user_id,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient address store failure; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    debug!(
                        operation = self.operation,
                        user_id = %self.user_id,
                        attempt,
                        error = %error,
                        "address store call failed"
                    );
                    return Err(error);
                }
                Ok(value) => return Ok(value),
            }
        }
    }
}

/// Translate a store failure into the domain error returned to callers.
///
/// Business refusals carry a details `code` so adapters and clients can tell
/// them apart without parsing messages.
pub(crate) fn map_store_error(error: AddressStoreError, user_id: &UserId) -> Error {
    match error {
        AddressStoreError::UserNotFound => Error::not_found(format!("user {user_id} not found"))
            .with_details(json!({ "code": USER_NOT_FOUND, "userId": user_id.as_ref() })),
        AddressStoreError::LimitExceeded { max } => Error::conflict(format!(
            "address limit of {max} reached"
        ))
        .with_details(json!({ "code": LIMIT_EXCEEDED, "maxAddresses": max })),
        AddressStoreError::IndexOutOfRange { .. } => {
            Error::not_found(format!("user {user_id} has no home address"))
                .with_details(json!({ "code": EMPTY_ADDRESS_COLLECTION }))
        }
        AddressStoreError::DuplicateAddressId { address_id } => Error::conflict(format!(
            "address id {address_id} already exists for user"
        ))
        .with_details(json!({ "code": DUPLICATE_ADDRESS_ID, "addressId": address_id })),
        AddressStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("address store unavailable: {message}"))
        }
        AddressStoreError::Query { message } => {
            Error::internal(format!("address store error: {message}"))
        }
    }
}
