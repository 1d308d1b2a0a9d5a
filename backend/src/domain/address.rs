//! Postal addresses embedded in a user document.
//!
//! An [`Address`] has no lifecycle of its own: it is created, overwritten and
//! stored only as an element of its owner's address collection. Element 0 of
//! that collection is the home address.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`AddressId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressValidationError {
    EmptyId,
}

impl fmt::Display for AddressValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "address id must not be empty"),
        }
    }
}

impl std::error::Error for AddressValidationError {}

/// Identifier of an address, unique within its owning collection.
///
/// Caller-supplied values are accepted verbatim.
///
/// # Examples
/// ```
/// use address_book::domain::AddressId;
///
/// let id = AddressId::new("64f1c2a9e4b0a1b2c3d4e5f6").expect("valid id");
/// assert_eq!(id.as_ref(), "64f1c2a9e4b0a1b2c3d4e5f6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AddressId(String);

impl AddressId {
    /// Validate and construct an [`AddressId`].
    pub fn new(id: impl Into<String>) -> Result<Self, AddressValidationError> {
        Self::from_owned(id.into())
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn from_owned(id: String) -> Result<Self, AddressValidationError> {
        if id.trim().is_empty() {
            return Err(AddressValidationError::EmptyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for AddressId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AddressId> for String {
    fn from(value: AddressId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AddressId {
    type Error = AddressValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// The free-text parts of an address.
///
/// Every field is optional and an absent field is distinct from an empty
/// string. Contents are not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    #[serde(rename = "house_name", default)]
    pub house: Option<String>,
    #[serde(rename = "street_name", default)]
    pub street: Option<String>,
    #[serde(rename = "city_name", default)]
    pub city: Option<String>,
    #[serde(rename = "pin_code", default)]
    pub pincode: Option<String>,
}

/// One element of a user's address collection.
///
/// # Examples
/// ```
/// use address_book::domain::{Address, AddressFields, AddressId};
///
/// let address = Address::new(
///     AddressId::random(),
///     AddressFields {
///         house: Some("123 Main St".to_owned()),
///         ..AddressFields::default()
///     },
/// );
/// assert_eq!(address.fields.house.as_deref(), Some("123 Main St"));
/// assert!(address.fields.pincode.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(alias = "Address_ID")]
    pub address_id: AddressId,
    #[serde(flatten)]
    pub fields: AddressFields,
}

impl Address {
    /// Assemble an address from its identifier and fields.
    pub fn new(address_id: AddressId, fields: AddressFields) -> Self {
        Self { address_id, fields }
    }
}

/// Wholesale overwrite of one collection element.
///
/// All four fields replace the stored ones, absent fields included. When
/// `address_id` is `None` the store keeps the identifier already held by
/// the element being overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressReplacement {
    pub address_id: Option<AddressId>,
    pub fields: AddressFields,
}

impl AddressReplacement {
    /// Build the element that replaces one currently identified by
    /// `current_id`.
    ///
    /// # Examples
    /// ```
    /// use address_book::domain::{AddressFields, AddressId, AddressReplacement};
    ///
    /// let current = AddressId::new("home").expect("valid id");
    /// let replacement = AddressReplacement {
    ///     address_id: None,
    ///     fields: AddressFields::default(),
    /// };
    /// let stored = replacement.into_address(&current);
    /// assert_eq!(stored.address_id, current);
    /// ```
    pub fn into_address(self, current_id: &AddressId) -> Address {
        let address_id = self.address_id.unwrap_or_else(|| current_id.clone());
        Address::new(address_id, self.fields)
    }
}
