//! Bounded append of a new address to a user's collection.
//!
//! The service reads the current count to refuse full collections early, then
//! asks the store for a conditional append that re-checks the bound
//! atomically. Two concurrent appends therefore can never push a collection
//! past `max_addresses`, whichever of them read the count first.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{AddressStore, AddressStoreError, AppendAddressCommand};
use crate::domain::store_call::{StoreCall, map_store_error};
use crate::domain::{Address, AddressBookPolicy, Error, UserId};

/// Address append service implementing [`AppendAddressCommand`].
#[derive(Clone)]
pub struct AddressAppendService<S> {
    store: Arc<S>,
    policy: AddressBookPolicy,
}

impl<S> AddressAppendService<S> {
    /// Create a new service over the given store.
    pub fn new(store: Arc<S>, policy: AddressBookPolicy) -> Self {
        Self { store, policy }
    }
}

impl<S> AddressAppendService<S>
where
    S: AddressStore,
{
    async fn current_count(&self, user_id: &UserId) -> Result<usize, AddressStoreError> {
        let store = &self.store;
        StoreCall::new(&self.policy, "find_user_address_count", user_id)
            .run(|_| store.find_user_address_count(user_id))
            .await
    }

    /// Decide whether a duplicate reported on a retry is this append's own
    /// earlier attempt, whose reply was lost, or a different stored address.
    async fn confirm_earlier_attempt(
        store: &S,
        user_id: &UserId,
        address: &Address,
        attempt: u32,
        duplicate: AddressStoreError,
    ) -> Result<(), AddressStoreError> {
        let stored = store.find_user_addresses(user_id).await?;
        if stored.iter().any(|existing| existing == address) {
            debug!(
                user_id = %user_id,
                address_id = %address.address_id,
                attempt,
                "append already applied by an earlier attempt"
            );
            Ok(())
        } else {
            Err(duplicate)
        }
    }

    async fn append_atomic(
        &self,
        user_id: &UserId,
        address: &Address,
    ) -> Result<(), AddressStoreError> {
        let store = &self.store;
        let max_addresses = self.policy.max_addresses();
        StoreCall::new(&self.policy, "append_address_atomic", user_id)
            .run(|attempt| async move {
                match store
                    .append_address_atomic(user_id, address, max_addresses)
                    .await
                {
                    Err(duplicate @ AddressStoreError::DuplicateAddressId { .. }) if attempt > 1 => {
                        Self::confirm_earlier_attempt(store, user_id, address, attempt, duplicate)
                            .await
                    }
                    other => other,
                }
            })
            .await
    }
}

#[async_trait]
impl<S> AppendAddressCommand for AddressAppendService<S>
where
    S: AddressStore,
{
    async fn append(&self, user_id: &UserId, address: Address) -> Result<(), Error> {
        let max_addresses = self.policy.max_addresses();

        let count = self
            .current_count(user_id)
            .await
            .map_err(|err| map_store_error(err, user_id))?;
        if count >= max_addresses {
            debug!(user_id = %user_id, count, max_addresses, "address limit reached");
            return Err(map_store_error(
                AddressStoreError::limit_exceeded(max_addresses),
                user_id,
            ));
        }

        self.append_atomic(user_id, &address)
            .await
            .map_err(|err| map_store_error(err, user_id))?;

        info!(
            user_id = %user_id,
            address_id = %address.address_id,
            "address appended"
        );
        Ok(())
    }
}
