//! Port for the user document store holding address collections.
//!
//! The [`AddressStore`] trait is the only way the domain touches persisted
//! addresses. Every mutation is a single atomic store operation keyed by
//! user: the bound check happens inside the append and the home overwrite is
//! a positional update, so no adapter ever needs a read-modify-write of the
//! whole collection.

use async_trait::async_trait;

use crate::domain::{Address, AddressReplacement, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by address store adapters.
    pub enum AddressStoreError {
        /// No user document matches the identifier.
        UserNotFound => "user document not found",
        /// The collection already holds `max` addresses.
        LimitExceeded { max: usize } =>
            "address collection already holds the maximum of {max} addresses",
        /// No element exists at the requested position.
        IndexOutOfRange { index: usize, len: usize } =>
            "no address at index {index} (collection holds {len})",
        /// Another element of the collection already uses this identifier.
        DuplicateAddressId { address_id: String } =>
            "address id {address_id} already present in the collection",
        /// Connectivity, deadline or other transient failure.
        Unavailable { message: String } =>
            "address store unavailable: {message}",
        /// Non-transient failure while executing the operation.
        Query { message: String } =>
            "address store query failed: {message}",
    }
}

impl AddressStoreError {
    /// Whether repeating the same call may succeed.
    ///
    /// # Examples
    /// ```
    /// use address_book::domain::ports::AddressStoreError;
    ///
    /// assert!(AddressStoreError::unavailable("timeout").is_transient());
    /// assert!(!AddressStoreError::user_not_found().is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Port for reading and atomically mutating a user's address collection.
///
/// # Atomicity
///
/// Implementations must execute each mutating method as one indivisible step
/// relative to other calls for the same user. Calls for different users must
/// not block one another.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Number of addresses currently held by the user.
    async fn find_user_address_count(&self, user_id: &UserId)
    -> Result<usize, AddressStoreError>;

    /// The user's full collection, in stored order.
    async fn find_user_addresses(&self, user_id: &UserId)
    -> Result<Vec<Address>, AddressStoreError>;

    /// Append `address` to the tail of the collection.
    ///
    /// Fails with [`AddressStoreError::LimitExceeded`] when the collection
    /// already holds `max_addresses` elements and with
    /// [`AddressStoreError::DuplicateAddressId`] when an element with the same
    /// identifier exists. The identifier check comes first, so a replayed
    /// append reports the duplicate even when it filled the collection.
    /// Neither failure mutates the collection.
    async fn append_address_atomic(
        &self,
        user_id: &UserId,
        address: &Address,
        max_addresses: usize,
    ) -> Result<(), AddressStoreError>;

    /// Overwrite the element at `index` in place.
    ///
    /// The collection length and every other element are untouched. When
    /// `replacement.address_id` is `None` the element keeps its identifier.
    /// Fails with [`AddressStoreError::IndexOutOfRange`] when no element
    /// exists at `index` and with [`AddressStoreError::DuplicateAddressId`]
    /// when an explicit identifier belongs to another element. Neither
    /// failure mutates the collection.
    async fn replace_address_at_index(
        &self,
        user_id: &UserId,
        index: usize,
        replacement: &AddressReplacement,
    ) -> Result<(), AddressStoreError>;
}
