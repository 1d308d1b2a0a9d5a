//! Driving port for overwriting a user's home address.

use async_trait::async_trait;

use crate::domain::{AddressReplacement, Error, UserId};

/// Driving port for replacing the home (first) address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplaceHomeAddressCommand: Send + Sync {
    /// Overwrite element 0 of the user's collection with `replacement`.
    ///
    /// Fields are replaced wholesale: an absent field in `replacement` is
    /// stored as absent. Length and the remaining elements never change.
    ///
    /// # Errors
    ///
    /// - [`crate::domain::ErrorCode::NotFound`] when the user does not exist
    ///   or has no addresses (details code `empty_address_collection`).
    /// - [`crate::domain::ErrorCode::Conflict`] when an explicit identifier
    ///   belongs to another element (details code `duplicate_address_id`).
    /// - [`crate::domain::ErrorCode::ServiceUnavailable`] when the store
    ///   cannot be reached within the deadline.
    async fn replace_home(
        &self,
        user_id: &UserId,
        replacement: AddressReplacement,
    ) -> Result<(), Error>;
}

/// Fixture command that accepts every replacement without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReplaceHomeAddressCommand;

#[async_trait]
impl ReplaceHomeAddressCommand for FixtureReplaceHomeAddressCommand {
    async fn replace_home(
        &self,
        _user_id: &UserId,
        _replacement: AddressReplacement,
    ) -> Result<(), Error> {
        Ok(())
    }
}
