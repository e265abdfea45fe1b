//! # Schema Migrations
//!
//! The storefront schema ships inside the binary. `sqlx::migrate!` embeds
//! every file under `migrations/sqlite/` at compile time, and sqlx tracks
//! what has been applied in the `_sqlx_migrations` table it manages itself.
//!
//! To change the schema, add a new `NNN_description.sql` file with the next
//! number. Shipped files are immutable; sqlx checksums them and refuses to
//! start if one was edited after being applied.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// All migrations under `migrations/sqlite/`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date.
///
/// Applies pending migrations in filename order, each inside its own
/// transaction. Running against an already-current database is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(
        embedded = MIGRATOR.migrations.len(),
        "Applying pending schema migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("Database schema is up to date");
    Ok(())
}

/// Migration bookkeeping for health checks: `(embedded, applied)`.
///
/// `applied` comes from `_sqlx_migrations`; a database that predates the
/// first migration reports zero.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, applied as usize))
}
