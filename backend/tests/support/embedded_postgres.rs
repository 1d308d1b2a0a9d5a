//! Embedded PostgreSQL bootstrap for the Diesel store suites.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` by default. When either
//! `PG_RUNTIME_DIR` or `PG_DATA_DIR` is unset both are pointed at a unique
//! directory under the cargo target dir for the duration of the bootstrap,
//! with environment mutation serialised through `env-lock`.
//!
//! Each suite gets a fresh database with the crate's own migrations applied,
//! so nothing leaks between tests sharing a cluster.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use address_book::domain::UserId;
use address_book::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

fn pg_embed_target_dir() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("pg-embed")
}

fn create_unique_pg_embed_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let base = pg_embed_target_dir().join(format!(
        "address-book-{}-{}",
        std::process::id(),
        Uuid::new_v4()
    ));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((runtime_dir, data_dir))
}

/// Binary downloads fail intermittently when suites start in parallel.
fn is_transient_error(err: &str) -> bool {
    let err_lower = err.to_lowercase();
    [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "temporarily unavailable",
        "dns error",
    ]
    .iter()
    .any(|pattern| err_lower.contains(pattern))
}

/// Start an embedded cluster, retrying transient download failures.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap_guard = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env_guard = if needs_override {
        let (runtime_dir, data_dir) =
            create_unique_pg_embed_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir.to_string_lossy().into_owned())),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == MAX_RETRIES || !is_transient_error(&last_error) {
                    break;
                }
                let delay = Duration::from_millis(RETRY_DELAY_MS * (1 << attempt));
                eprintln!(
                    "pg-embed: transient error on attempt {}/{}, retrying in {delay:?}: {last_error}",
                    attempt + 1,
                    MAX_RETRIES + 1,
                );
                std::thread::sleep(delay);
            }
        }
    }
    Err(last_error)
}

/// True when `SKIP_TEST_CLUSTER` is "1", "true" or "yes" (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed, otherwise fail loudly so CI breakage shows.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Render a `postgres` error with its SQLSTATE and detail when present.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Create an empty database on `cluster` and return its URL.
pub fn create_database(cluster: &TestCluster) -> Result<String, String> {
    let name = format!("address_book_{}", Uuid::new_v4().simple());
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(cluster.connection().database_url(&name))
}

/// Apply the crate's embedded migrations to the database at `url`.
pub async fn migrate_schema(url: &str) -> Result<(), String> {
    run_pending_migrations(url)
        .await
        .map_err(|err| err.to_string())
}

/// Insert a user row holding an empty collection.
pub fn seed_user(url: &str, user_id: &UserId) -> Result<(), String> {
    let id: &str = user_id.as_ref();
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute("INSERT INTO users (user_id) VALUES ($1)", &[&id])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}
