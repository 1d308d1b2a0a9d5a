//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags and `ADDRESS_BOOK_*` environment variables.
//! Every field is optional; accessors fall back to the documented defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    AddressBookPolicy, AddressBookPolicyError, HomeIdentityPolicy, ParseHomeIdentityPolicyError,
    StoreRetryPolicy, UserId, UserValidationError,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised when settings cannot be turned into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error(transparent)]
    HomeIdentity(#[from] ParseHomeIdentityPolicyError),
    #[error(transparent)]
    Policy(#[from] AddressBookPolicyError),
    #[error("invalid seed user id {value:?}: {source}")]
    SeedUser {
        value: String,
        #[source]
        source: UserValidationError,
    },
}

/// Configuration values for the address book service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADDRESS_BOOK")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Upper bound on addresses per user.
    pub max_addresses: Option<usize>,
    /// `preserve` or `regenerate`.
    pub home_identity: Option<String>,
    /// Deadline for a single store call, in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// Total attempts for a store call failing transiently.
    pub store_retry_attempts: Option<u32>,
    /// Base delay between store attempts, in milliseconds.
    pub store_retry_backoff_ms: Option<u64>,
    /// Comma-separated user ids registered at start-up in the in-memory
    /// store. Ignored when a database is configured.
    pub seed_users: Option<String>,
}

impl AppSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// User ids to register in the in-memory store.
    ///
    /// Blank entries are skipped; any other entry must be a valid user id.
    pub fn seed_user_ids(&self) -> Result<Vec<UserId>, SettingsError> {
        self.seed_users
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                UserId::new(raw).map_err(|source| SettingsError::SeedUser {
                    value: raw.to_owned(),
                    source,
                })
            })
            .collect()
    }

    /// Configured pool size, falling back to ten connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Assemble the [`AddressBookPolicy`] from the configured overrides.
    pub fn policy(&self) -> Result<AddressBookPolicy, SettingsError> {
        let defaults = AddressBookPolicy::default();
        let mut policy =
            AddressBookPolicy::new(self.max_addresses.unwrap_or(defaults.max_addresses()))?;

        if let Some(raw) = self.home_identity.as_deref() {
            policy = policy.with_home_identity(raw.parse::<HomeIdentityPolicy>()?);
        }
        if let Some(ms) = self.store_timeout_ms {
            policy = policy.with_store_timeout(Duration::from_millis(ms))?;
        }

        let mut retry = StoreRetryPolicy::default();
        if let Some(attempts) = self.store_retry_attempts {
            retry.max_attempts = attempts.max(1);
        }
        if let Some(ms) = self.store_retry_backoff_ms {
            retry.initial_backoff = Duration::from_millis(ms);
        }
        Ok(policy.with_retry(retry))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "ADDRESS_BOOK_BIND_ADDR",
        "ADDRESS_BOOK_DATABASE_URL",
        "ADDRESS_BOOK_POOL_MAX_SIZE",
        "ADDRESS_BOOK_MAX_ADDRESSES",
        "ADDRESS_BOOK_HOME_IDENTITY",
        "ADDRESS_BOOK_STORE_TIMEOUT_MS",
        "ADDRESS_BOOK_STORE_RETRY_ATTEMPTS",
        "ADDRESS_BOOK_STORE_RETRY_BACKOFF_MS",
        "ADDRESS_BOOK_SEED_USERS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("address-book")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        let policy = settings.policy().expect("default policy");

        assert_eq!(
            settings.bind_addr().expect("default bind"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid literal")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(policy, AddressBookPolicy::default());
        assert!(settings.seed_user_ids().expect("no seed users").is_empty());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ADDRESS_BOOK_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "ADDRESS_BOOK_DATABASE_URL",
                Some("postgres://localhost/address_book".to_owned()),
            ),
            ("ADDRESS_BOOK_POOL_MAX_SIZE", Some("4".to_owned())),
            ("ADDRESS_BOOK_MAX_ADDRESSES", Some("5".to_owned())),
            ("ADDRESS_BOOK_HOME_IDENTITY", Some("regenerate".to_owned())),
            ("ADDRESS_BOOK_STORE_TIMEOUT_MS", Some("250".to_owned())),
            ("ADDRESS_BOOK_STORE_RETRY_ATTEMPTS", Some("1".to_owned())),
            ("ADDRESS_BOOK_STORE_RETRY_BACKOFF_MS", Some("10".to_owned())),
            ("ADDRESS_BOOK_SEED_USERS", Some("alice, ,bob".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let policy = settings.policy().expect("policy");

        assert_eq!(
            settings.bind_addr().expect("bind"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("valid literal")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/address_book")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(policy.max_addresses(), 5);
        assert_eq!(policy.home_identity(), HomeIdentityPolicy::Regenerate);
        assert_eq!(policy.store_timeout(), Duration::from_millis(250));
        assert_eq!(policy.retry().max_attempts, 1);
        assert_eq!(policy.retry().initial_backoff, Duration::from_millis(10));
        let seeded: Vec<String> = settings
            .seed_user_ids()
            .expect("valid seed users")
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(seeded, ["alice", "bob"]);
    }

    #[rstest]
    #[case(AppSettings { max_addresses: Some(0), ..AppSettings::default() })]
    #[case(AppSettings { home_identity: Some("keep".to_owned()), ..AppSettings::default() })]
    #[case(AppSettings { store_timeout_ms: Some(0), ..AppSettings::default() })]
    fn invalid_policy_values_are_rejected(#[case] settings: AppSettings) {
        assert!(settings.policy().is_err());
    }

    #[rstest]
    fn malformed_seed_users_are_rejected() {
        let settings = AppSettings {
            seed_users: Some("alice,bad id".to_owned()),
            ..AppSettings::default()
        };
        match settings.seed_user_ids() {
            Err(SettingsError::SeedUser { value, .. }) => assert_eq!(value, "bad id"),
            other => panic!("expected a seed user error, got {other:?}"),
        }
    }

    #[rstest]
    fn malformed_bind_addresses_are_rejected() {
        let settings = AppSettings {
            bind_addr: Some("not-an-address".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }
}
