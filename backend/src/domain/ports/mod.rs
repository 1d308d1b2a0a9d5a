//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports describe what the domain needs from persistence; driving
//! ports describe what inbound adapters may ask of the domain. Port errors
//! are strongly typed so adapters map their failures into predictable
//! variants.

mod macros;
pub(crate) use macros::define_port_error;

mod address_store;
mod append_address_command;
mod replace_home_address_command;

#[cfg(test)]
pub use address_store::MockAddressStore;
pub use address_store::{AddressStore, AddressStoreError};
#[cfg(test)]
pub use append_address_command::MockAppendAddressCommand;
pub use append_address_command::{AppendAddressCommand, FixtureAppendAddressCommand};
#[cfg(test)]
pub use replace_home_address_command::MockReplaceHomeAddressCommand;
pub use replace_home_address_command::{
    FixtureReplaceHomeAddressCommand, ReplaceHomeAddressCommand,
};
