//! Tunables shared by the address book services.
//!
//! The collection bound and the identity rule for home-address overwrites
//! are deployment decisions, so they travel as configuration rather than
//! constants. The same value also carries the store deadline and the retry
//! budget for transient store faults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default upper bound on the number of addresses per user.
pub const DEFAULT_MAX_ADDRESSES: usize = 2;

/// How the identifier of the home address behaves when it is overwritten.
///
/// # Examples
/// ```
/// use address_book::domain::HomeIdentityPolicy;
///
/// assert_eq!(HomeIdentityPolicy::default(), HomeIdentityPolicy::Preserve);
/// assert_eq!(
///     "regenerate".parse::<HomeIdentityPolicy>().expect("known policy"),
///     HomeIdentityPolicy::Regenerate
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HomeIdentityPolicy {
    /// Keep the stored identifier unless the caller supplies one.
    #[default]
    Preserve,
    /// Assign a fresh identifier unless the caller supplies one.
    Regenerate,
}

impl HomeIdentityPolicy {
    /// Configuration string for the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Regenerate => "regenerate",
        }
    }
}

impl fmt::Display for HomeIdentityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown identity policy string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown home identity policy: {input}")]
pub struct ParseHomeIdentityPolicyError {
    /// The unrecognised input value.
    pub input: String,
}

impl FromStr for HomeIdentityPolicy {
    type Err = ParseHomeIdentityPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(Self::Preserve),
            "regenerate" => Ok(Self::Regenerate),
            other => Err(ParseHomeIdentityPolicyError {
                input: other.to_owned(),
            }),
        }
    }
}

/// Bounded retry budget for transient store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreRetryPolicy {
    /// Total attempts per store call, the first one included.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each later one.
    pub initial_backoff: Duration,
    /// Cap applied to the doubled delay.
    pub max_backoff: Duration,
}

impl Default for StoreRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_secs(1),
        }
    }
}

impl StoreRetryPolicy {
    /// A policy that never retries.
    pub fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Exponential delay before the attempt following `attempt`, capped at
    /// `max_backoff`.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use address_book::domain::StoreRetryPolicy;
    ///
    /// let policy = StoreRetryPolicy {
    ///     max_attempts: 5,
    ///     initial_backoff: Duration::from_millis(100),
    ///     max_backoff: Duration::from_millis(250),
    /// };
    /// assert_eq!(policy.base_delay(1), Duration::from_millis(100));
    /// assert_eq!(policy.base_delay(2), Duration::from_millis(200));
    /// assert_eq!(policy.base_delay(3), Duration::from_millis(250));
    /// ```
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1_u32 << exponent)
            .min(self.max_backoff)
    }

    /// [`StoreRetryPolicy::base_delay`] plus up to a quarter of random
    /// jitter, so callers that failed together do not retry in lockstep.
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        let extra = rand::thread_rng().gen_range(0..=base_ms / 4);
        Duration::from_millis(base_ms.saturating_add(extra))
    }
}

/// Validation errors returned by [`AddressBookPolicy::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressBookPolicyError {
    /// A collection must be allowed to hold at least one address.
    #[error("max addresses must be at least 1")]
    ZeroMaxAddresses,
    /// Store calls need a non-zero deadline.
    #[error("store timeout must be greater than zero")]
    ZeroStoreTimeout,
}

/// Configuration consumed by the address book services.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use address_book::domain::{AddressBookPolicy, HomeIdentityPolicy};
///
/// let policy = AddressBookPolicy::new(3)
///     .expect("valid bound")
///     .with_home_identity(HomeIdentityPolicy::Regenerate)
///     .with_store_timeout(Duration::from_secs(2))
///     .expect("valid timeout");
/// assert_eq!(policy.max_addresses(), 3);
/// assert_eq!(policy.home_identity(), HomeIdentityPolicy::Regenerate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBookPolicy {
    max_addresses: usize,
    home_identity: HomeIdentityPolicy,
    store_timeout: Duration,
    retry: StoreRetryPolicy,
}

impl Default for AddressBookPolicy {
    fn default() -> Self {
        Self {
            max_addresses: DEFAULT_MAX_ADDRESSES,
            home_identity: HomeIdentityPolicy::default(),
            store_timeout: Duration::from_secs(5),
            retry: StoreRetryPolicy::default(),
        }
    }
}

impl AddressBookPolicy {
    /// Policy with the given bound and defaults for everything else.
    pub fn new(max_addresses: usize) -> Result<Self, AddressBookPolicyError> {
        if max_addresses == 0 {
            return Err(AddressBookPolicyError::ZeroMaxAddresses);
        }
        Ok(Self {
            max_addresses,
            ..Self::default()
        })
    }

    /// Set the home-address identity rule.
    #[must_use]
    pub fn with_home_identity(mut self, home_identity: HomeIdentityPolicy) -> Self {
        self.home_identity = home_identity;
        self
    }

    /// Set the deadline applied to each store call.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Result<Self, AddressBookPolicyError> {
        if timeout.is_zero() {
            return Err(AddressBookPolicyError::ZeroStoreTimeout);
        }
        self.store_timeout = timeout;
        Ok(self)
    }

    /// Set the retry budget for transient store failures.
    #[must_use]
    pub fn with_retry(mut self, retry: StoreRetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Maximum number of addresses a user may hold.
    pub fn max_addresses(&self) -> usize {
        self.max_addresses
    }

    /// Identity rule for home-address overwrites.
    pub fn home_identity(&self) -> HomeIdentityPolicy {
        self.home_identity
    }

    /// Deadline applied to each store call.
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Retry budget for transient store failures.
    pub fn retry(&self) -> StoreRetryPolicy {
        self.retry
    }
}
