//! Wholesale overwrite of a user's home address.
//!
//! The home address is the element at index 0. Overwriting it is a single
//! positional update in the store: the collection length and every other
//! element are left exactly as they were, and replaying the same replacement
//! yields the same stored state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AddressStore, ReplaceHomeAddressCommand};
use crate::domain::store_call::{StoreCall, map_store_error};
use crate::domain::{
    AddressBookPolicy, AddressId, AddressReplacement, Error, HomeIdentityPolicy, UserId,
};

/// Position of the home address within a collection.
pub const HOME_ADDRESS_INDEX: usize = 0;

/// Home address replacement service implementing
/// [`ReplaceHomeAddressCommand`].
#[derive(Clone)]
pub struct HomeAddressReplaceService<S> {
    store: Arc<S>,
    policy: AddressBookPolicy,
}

impl<S> HomeAddressReplaceService<S> {
    /// Create a new service over the given store.
    pub fn new(store: Arc<S>, policy: AddressBookPolicy) -> Self {
        Self { store, policy }
    }

    /// Apply the identity policy to a caller-supplied replacement.
    ///
    /// A caller-supplied identifier always wins. The identifier is resolved
    /// once, before any store attempt, so retries write the same element.
    fn resolve_identity(&self, replacement: AddressReplacement) -> AddressReplacement {
        match (self.policy.home_identity(), replacement.address_id) {
            (_, Some(address_id)) => AddressReplacement {
                address_id: Some(address_id),
                fields: replacement.fields,
            },
            (HomeIdentityPolicy::Preserve, None) => AddressReplacement {
                address_id: None,
                fields: replacement.fields,
            },
            (HomeIdentityPolicy::Regenerate, None) => AddressReplacement {
                address_id: Some(AddressId::random()),
                fields: replacement.fields,
            },
        }
    }
}

#[async_trait]
impl<S> ReplaceHomeAddressCommand for HomeAddressReplaceService<S>
where
    S: AddressStore,
{
    async fn replace_home(
        &self,
        user_id: &UserId,
        replacement: AddressReplacement,
    ) -> Result<(), Error> {
        let replacement = self.resolve_identity(replacement);
        let store = &self.store;
        let replacement_ref = &replacement;

        StoreCall::new(&self.policy, "replace_address_at_index", user_id)
            .run(|_| store.replace_address_at_index(user_id, HOME_ADDRESS_INDEX, replacement_ref))
            .await
            .map_err(|err| map_store_error(err, user_id))?;

        info!(
            user_id = %user_id,
            identity = %self.policy.home_identity(),
            "home address replaced"
        );
        Ok(())
    }
}
