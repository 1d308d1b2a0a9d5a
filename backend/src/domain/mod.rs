//! Domain primitives, ports and services for the address book.
//!
//! Purpose: own the rules for mutating a user's address collection. The
//! domain knows nothing about HTTP or SQL; adapters reach it through the
//! driving ports and it reaches persistence through [`ports::AddressStore`].
//!
//! Public surface:
//! - `UserId`, `AddressId`, `Address`, `AddressFields`, `AddressReplacement`
//!   - identifiers and value types for collection elements.
//! - `AddressBookPolicy` - collection bound, home identity rule, store
//!   deadline and retry budget.
//! - `AddressAppendService`, `HomeAddressReplaceService` - implementations
//!   of the driving ports.
//! - `Error`, `ErrorCode` - transport-agnostic failure payload.
//! - `TraceId` - request correlation identifier.

pub mod address;
pub mod address_appender;
pub mod address_book_policy;
pub mod error;
pub mod home_address_replacer;
pub mod ports;
mod store_call;
pub mod trace_id;
pub mod user;

pub use self::address::{
    Address, AddressFields, AddressId, AddressReplacement, AddressValidationError,
};
pub use self::address_appender::AddressAppendService;
pub use self::address_book_policy::{
    AddressBookPolicy, AddressBookPolicyError, DEFAULT_MAX_ADDRESSES, HomeIdentityPolicy,
    ParseHomeIdentityPolicyError, StoreRetryPolicy,
};
pub use self::error::{Error, ErrorCode};
pub use self::home_address_replacer::{HOME_ADDRESS_INDEX, HomeAddressReplaceService};
pub use self::store_call::{
    DUPLICATE_ADDRESS_ID, EMPTY_ADDRESS_COLLECTION, LIMIT_EXCEEDED, USER_NOT_FOUND,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserValidationError};
