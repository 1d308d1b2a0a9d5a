//! In-memory address store backed by a sharded concurrent map.
//!
//! Each mutation holds the user's entry lock for the whole check-and-write,
//! which gives the same per-user atomicity as the conditional `UPDATE` of the
//! PostgreSQL adapter. Users in different shards never contend.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::ports::{AddressStore, AddressStoreError};
use crate::domain::{Address, AddressReplacement, UserId};

/// [`AddressStore`] holding every user document in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAddressStore {
    users: DashMap<UserId, Vec<Address>>,
}

impl InMemoryAddressStore {
    /// Create an empty store with no registered users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an empty collection.
    ///
    /// Returns `false` and leaves the document untouched when the user
    /// already exists.
    pub fn insert_user(&self, user_id: UserId) -> bool {
        self.insert_user_with_addresses(user_id, Vec::new())
    }

    /// Register a user with a pre-populated collection.
    pub fn insert_user_with_addresses(&self, user_id: UserId, addresses: Vec<Address>) -> bool {
        match self.users.entry(user_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(addresses);
                true
            }
        }
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl AddressStore for InMemoryAddressStore {
    async fn find_user_address_count(
        &self,
        user_id: &UserId,
    ) -> Result<usize, AddressStoreError> {
        self.users
            .get(user_id)
            .map(|addresses| addresses.len())
            .ok_or_else(AddressStoreError::user_not_found)
    }

    async fn find_user_addresses(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Address>, AddressStoreError> {
        self.users
            .get(user_id)
            .map(|addresses| addresses.clone())
            .ok_or_else(AddressStoreError::user_not_found)
    }

    async fn append_address_atomic(
        &self,
        user_id: &UserId,
        address: &Address,
        max_addresses: usize,
    ) -> Result<(), AddressStoreError> {
        let mut addresses = self
            .users
            .get_mut(user_id)
            .ok_or_else(AddressStoreError::user_not_found)?;

        if addresses
            .iter()
            .any(|existing| existing.address_id == address.address_id)
        {
            return Err(AddressStoreError::duplicate_address_id(
                address.address_id.as_ref(),
            ));
        }
        if addresses.len() >= max_addresses {
            return Err(AddressStoreError::limit_exceeded(max_addresses));
        }
        addresses.push(address.clone());
        Ok(())
    }

    async fn replace_address_at_index(
        &self,
        user_id: &UserId,
        index: usize,
        replacement: &AddressReplacement,
    ) -> Result<(), AddressStoreError> {
        let mut addresses = self
            .users
            .get_mut(user_id)
            .ok_or_else(AddressStoreError::user_not_found)?;

        let len = addresses.len();
        if index >= len {
            return Err(AddressStoreError::index_out_of_range(index, len));
        }
        if let Some(explicit) = replacement.address_id.as_ref() {
            let taken = addresses
                .iter()
                .enumerate()
                .any(|(position, existing)| position != index && existing.address_id == *explicit);
            if taken {
                return Err(AddressStoreError::duplicate_address_id(explicit.as_ref()));
            }
        }
        let slot = addresses
            .get_mut(index)
            .ok_or_else(|| AddressStoreError::index_out_of_range(index, len))?;
        *slot = replacement.clone().into_address(&slot.address_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{AddressFields, AddressId};
    use rstest::{fixture, rstest};

    fn address(id: &str, house: &str) -> Address {
        Address::new(
            AddressId::new(id).expect("valid id"),
            AddressFields {
                house: Some(house.to_owned()),
                ..AddressFields::default()
            },
        )
    }

    #[fixture]
    fn user_id() -> UserId {
        UserId::new("user-1").expect("valid id")
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_users_are_not_found(user_id: UserId) {
        let store = InMemoryAddressStore::new();

        let count = store.find_user_address_count(&user_id).await;
        let append = store
            .append_address_atomic(&user_id, &address("a", "1"), 2)
            .await;

        assert!(matches!(count, Err(AddressStoreError::UserNotFound)));
        assert!(matches!(append, Err(AddressStoreError::UserNotFound)));
    }

    #[rstest]
    fn insert_user_keeps_existing_documents(user_id: UserId) {
        let store = InMemoryAddressStore::new();
        assert!(store.insert_user_with_addresses(user_id.clone(), vec![address("a", "1")]));
        assert!(!store.insert_user(user_id));
        assert_eq!(store.user_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn append_stops_at_the_bound(user_id: UserId) {
        let store = InMemoryAddressStore::new();
        store.insert_user(user_id.clone());

        store
            .append_address_atomic(&user_id, &address("a", "1"), 2)
            .await
            .expect("first append");
        store
            .append_address_atomic(&user_id, &address("b", "2"), 2)
            .await
            .expect("second append");
        let third = store
            .append_address_atomic(&user_id, &address("c", "3"), 2)
            .await;

        assert!(matches!(
            third,
            Err(AddressStoreError::LimitExceeded { max: 2 })
        ));
        let stored = store.find_user_addresses(&user_id).await.expect("read");
        assert_eq!(stored, vec![address("a", "1"), address("b", "2")]);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_ids_are_refused_before_the_bound(user_id: UserId) {
        let store = InMemoryAddressStore::new();
        store.insert_user_with_addresses(user_id.clone(), vec![address("a", "1")]);

        let result = store
            .append_address_atomic(&user_id, &address("a", "other"), 1)
            .await;

        assert!(matches!(
            result,
            Err(AddressStoreError::DuplicateAddressId { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn replace_keeps_identity_and_tail(user_id: UserId) {
        let store = InMemoryAddressStore::new();
        store.insert_user_with_addresses(
            user_id.clone(),
            vec![address("home", "1"), address("office", "2")],
        );

        store
            .replace_address_at_index(
                &user_id,
                0,
                &AddressReplacement {
                    address_id: None,
                    fields: AddressFields {
                        house: Some("9".to_owned()),
                        ..AddressFields::default()
                    },
                },
            )
            .await
            .expect("replace");

        let stored = store.find_user_addresses(&user_id).await.expect("read");
        assert_eq!(stored, vec![address("home", "9"), address("office", "2")]);
    }

    #[rstest]
    #[tokio::test]
    async fn replace_refuses_an_identifier_held_by_another_element(user_id: UserId) {
        let store = InMemoryAddressStore::new();
        store.insert_user_with_addresses(
            user_id.clone(),
            vec![address("home", "1"), address("office", "2")],
        );

        let result = store
            .replace_address_at_index(
                &user_id,
                0,
                &AddressReplacement {
                    address_id: Some(AddressId::new("office").expect("valid id")),
                    fields: AddressFields::default(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(AddressStoreError::DuplicateAddressId { ref address_id }) if address_id == "office"
        ));
        let stored = store.find_user_addresses(&user_id).await.expect("read");
        assert_eq!(stored, vec![address("home", "1"), address("office", "2")]);
    }

    #[rstest]
    #[tokio::test]
    async fn replace_may_restate_the_slot_identifier(user_id: UserId) {
        let store = InMemoryAddressStore::new();
        store.insert_user_with_addresses(
            user_id.clone(),
            vec![address("home", "1"), address("office", "2")],
        );

        store
            .replace_address_at_index(
                &user_id,
                0,
                &AddressReplacement {
                    address_id: Some(AddressId::new("home").expect("valid id")),
                    fields: AddressFields {
                        house: Some("7".to_owned()),
                        ..AddressFields::default()
                    },
                },
            )
            .await
            .expect("same identifier is allowed");

        let stored = store.find_user_addresses(&user_id).await.expect("read");
        assert_eq!(stored, vec![address("home", "7"), address("office", "2")]);
    }

    #[rstest]
    #[tokio::test]
    async fn replace_on_empty_collection_is_out_of_range(user_id: UserId) {
        let store = InMemoryAddressStore::new();
        store.insert_user(user_id.clone());

        let result = store
            .replace_address_at_index(
                &user_id,
                0,
                &AddressReplacement {
                    address_id: None,
                    fields: AddressFields::default(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(AddressStoreError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(
            store
                .find_user_addresses(&user_id)
                .await
                .expect("read")
                .is_empty()
        );
    }
}
