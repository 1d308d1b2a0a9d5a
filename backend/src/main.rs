//! Backend entry-point: loads settings, wires the address store, and serves
//! the address book endpoints.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use address_book::inbound::http::health::HealthState;
use address_book::outbound::memory::InMemoryAddressStore;
use address_book::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use address_book::settings::AppSettings;
use server::{ServerConfig, StoreBackend, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let policy = settings.policy()?;
    let store = build_store(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, store).with_policy(policy);
    let server = create_server(health_state, config).wrap_err("failed to bind HTTP server")?;
    server.await.wrap_err("HTTP server terminated abnormally")
}

async fn build_store(settings: &AppSettings) -> color_eyre::Result<StoreBackend> {
    let Some(database_url) = settings.database_url.as_deref() else {
        let store = InMemoryAddressStore::new();
        for user_id in settings.seed_user_ids()? {
            store.insert_user(user_id);
        }
        warn!(
            seeded_users = store.user_count(),
            "no database configured; using the in-memory address store"
        );
        return Ok(StoreBackend::InMemory(Arc::new(store)));
    };

    run_pending_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build database pool")?;
    info!(max_size = settings.pool_max_size(), "database pool ready");
    Ok(StoreBackend::Postgres(pool))
}
