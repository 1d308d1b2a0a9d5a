//! Driving port for adding an address to a user's collection.
//!
//! HTTP handlers call [`AppendAddressCommand`]; the domain service enforces
//! the collection bound and the store's atomic append.

use async_trait::async_trait;

use crate::domain::{Address, Error, UserId};

/// Driving port for appending addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppendAddressCommand: Send + Sync {
    /// Append `address` to the tail of the user's collection.
    ///
    /// # Errors
    ///
    /// - [`crate::domain::ErrorCode::NotFound`] when the user does not exist.
    /// - [`crate::domain::ErrorCode::Conflict`] when the collection is full or
    ///   already holds an address with the same identifier.
    /// - [`crate::domain::ErrorCode::ServiceUnavailable`] when the store
    ///   cannot be reached within the deadline.
    async fn append(&self, user_id: &UserId, address: Address) -> Result<(), Error>;
}

/// Fixture command that accepts every append without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAppendAddressCommand;

#[async_trait]
impl AppendAddressCommand for FixtureAppendAddressCommand {
    async fn append(&self, _user_id: &UserId, _address: Address) -> Result<(), Error> {
        Ok(())
    }
}
