//! Embedded schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while bringing the schema up to date.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task aborted: {message}")]
    Join { message: String },
}

/// Apply every pending migration to the database at `database_url`.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking thread pool.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url).map_err(|err| MigrationError::Connect {
            message: err.to_string(),
        })?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        info!(applied = applied.len(), "database migrations applied");
        Ok(())
    })
    .await
    .map_err(|err| MigrationError::Join {
        message: err.to_string(),
    })?
}
